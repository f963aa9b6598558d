mod builder;
mod walker;

pub use builder::WalkBuilder;
pub use walker::{DirLevel, Walk};

/// Receives the error of every directory the walk could not list
pub(crate) type ErrorCallback<'a> = Box<dyn FnMut(crate::ScanError) + 'a>;
