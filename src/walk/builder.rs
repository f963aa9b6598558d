use crate::{
    ScanError,
    fs::{DirectoryEnumerator, NativeEnumerator},
    walk::{ErrorCallback, Walk},
};
use core::marker::PhantomData;
use std::path::{Path, PathBuf};

/**
 A builder for creating a [`Walk`] with customisable options.

 Defaults match the conventional directory walk: top-down order, errors
 silently skipped, symlinks to directories listed but not descended into.

 # Examples
 ```
 use scandir::Walk;

 let dir = tempfile::tempdir().unwrap();
 std::fs::create_dir(dir.path().join("child")).unwrap();

 let mut errors = 0;
 let levels: Vec<_> = Walk::builder(dir.path())
     .topdown(false)
     .on_error(|_| errors += 1)
     .build()
     .collect();

 // bottom-up: the child comes before the root
 assert_eq!(levels.len(), 2);
 assert_eq!(levels[1].path, dir.path());
 assert_eq!(errors, 0);
 ```
*/
pub struct WalkBuilder<'a, E: DirectoryEnumerator = NativeEnumerator> {
    pub(crate) root: PathBuf,
    pub(crate) topdown: bool,
    pub(crate) follow_links: bool,
    pub(crate) on_error: Option<ErrorCallback<'a>>,
    pub(crate) _enumerator: PhantomData<fn() -> E>,
}

impl<'a> WalkBuilder<'a> {
    /**
      Creates a new `WalkBuilder` using the native enumerator.

      # Arguments
      `root` - The directory to start from, yielded as-is as the first path
    */
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            topdown: true,
            follow_links: false,
            on_error: None,
            _enumerator: PhantomData,
        }
    }
}

impl<'a, E: DirectoryEnumerator> WalkBuilder<'a, E> {
    /// Yield each directory before (true, default) or after (false) its subdirectories
    #[must_use]
    pub const fn topdown(mut self, topdown: bool) -> Self {
        self.topdown = topdown;
        self
    }

    /// Descend into symlinks that point to directories, defaults to false.
    ///
    /// The walker does not detect cycles when this is enabled.
    #[must_use]
    pub const fn follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Called with the error whenever a directory cannot be listed. Without
    /// a callback such directories are skipped silently.
    #[must_use]
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: FnMut(ScanError) + 'a,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Lists directories with a different enumerator, e.g. [`ListDir`](crate::fs::ListDir)
    #[must_use]
    pub fn enumerator<F: DirectoryEnumerator>(self) -> WalkBuilder<'a, F> {
        WalkBuilder {
            root: self.root,
            topdown: self.topdown,
            follow_links: self.follow_links,
            on_error: self.on_error,
            _enumerator: PhantomData,
        }
    }

    /// Builds the walk, nothing is read until the first level is requested
    #[must_use]
    pub fn build(self) -> Walk<'a, E> {
        Walk::from_builder(self)
    }
}
