use crate::error::Result;
use crate::fs::DirEntry;
use crate::sys::NativeEnumerator;
use std::{path::Path, sync::Arc};

/**
 A platform directory-listing primitive.

 Implementations own exactly one OS handle. They yield every entry except
 `.` and `..`, and must release the handle on [`close`](Self::close) (and on
 drop, as a last resort).

 The crate ships three:
 - [`ReadDir`](crate::fs::ReadDir): POSIX `opendir`/`readdir`/`closedir`, type from `d_type`
 - [`FindFiles`](crate::fs::FindFiles): Windows `FindFirstFileW`/`FindNextFileW`/`FindClose`,
   type and metadata from the find-data record
 - [`ListDir`](crate::fs::ListDir): plain name listing, every type resolved with `lstat`

 [`NativeEnumerator`] is the one picked for the current target at compile time.
*/
pub trait DirectoryEnumerator: Sized {
    /**
    Opens `dir` for enumeration.

    # Errors
    Returns [`ScanError::Open`](crate::ScanError::Open) if the path does not exist, is not a
    directory or is not accessible.
    */
    fn open(dir: Arc<Path>) -> Result<Self>;

    /// Returns the next entry, `None` at the end of the directory.
    fn next_entry(&mut self) -> Option<Result<DirEntry>>;

    /**
    Releases the OS handle. Later calls are no-ops returning `Ok(())`.

    # Errors
    Returns [`ScanError::Close`](crate::ScanError::Close) if the OS reports a failure while closing.
    */
    fn close(&mut self) -> Result<()>;
}

/**
 Lazy, forward-only sequence of the entries of one directory.

 Created by [`scandir`](crate::scandir) or [`scandir_with`](crate::scandir_with).
 The directory handle is released exactly once:
 - at the end of the directory (a close failure is yielded as a final `Err`),
 - after the first error (the iterator is fused afterwards),
 - by [`ScanDir::close`], which reports the close result,
 - or when the iterator is dropped early (a close failure is logged).
*/
#[derive(Debug)]
pub struct ScanDir<E: DirectoryEnumerator = NativeEnumerator> {
    inner: E,
    path: Arc<Path>,
    finished: bool,
    closed: bool,
}

impl<E: DirectoryEnumerator> ScanDir<E> {
    #[inline]
    pub(crate) fn open(path: &Path) -> Result<Self> {
        // an empty path lists the current directory
        let path: Arc<Path> = if path.as_os_str().is_empty() {
            Arc::from(Path::new("."))
        } else {
            Arc::from(path)
        };
        crate::sys::reject_nul(&path)?;
        let inner = E::open(Arc::clone(&path))?;
        Ok(Self {
            inner,
            path,
            finished: false,
            closed: false,
        })
    }

    /// The directory being listed
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /**
    Stops the iteration and releases the directory handle.

    # Errors
    Returns [`ScanError::Close`](crate::ScanError::Close) if closing fails. Returns `Ok(())` if the
    handle was already released by reaching the end of the directory.
    */
    #[inline]
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        self.finished = true;
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.inner.close()
    }
}

impl<E: DirectoryEnumerator> Iterator for ScanDir<E> {
    type Item = Result<DirEntry>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next_entry() {
            Some(Ok(entry)) => Some(Ok(entry)),
            Some(Err(error)) => {
                // The read error is what the caller needs to see, a close
                // failure on top of it is only logged.
                if let Err(close_error) = self.release() {
                    tracing::warn!(%close_error, "failed to close directory after read error");
                }
                Some(Err(error))
            }
            None => self.release().err().map(Err),
        }
    }
}

impl<E: DirectoryEnumerator> core::iter::FusedIterator for ScanDir<E> {}

impl<E: DirectoryEnumerator> Drop for ScanDir<E> {
    #[inline]
    fn drop(&mut self) {
        if let Err(error) = self.release() {
            tracing::warn!(%error, "failed to close abandoned directory iterator");
        }
    }
}

