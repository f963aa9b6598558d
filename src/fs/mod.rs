mod dir_entry;
pub(crate) mod file_type;
mod iter;
mod stat;

pub use dir_entry::DirEntry;
pub use file_type::FileType;
pub use iter::{DirectoryEnumerator, ScanDir};
pub use stat::StatResult;

#[cfg(windows)]
pub use crate::sys::FindFiles;
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
pub use crate::sys::ReadDir;
pub use crate::sys::{ListDir, NativeEnumerator};
