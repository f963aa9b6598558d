use crate::error::{Result, ScanError};
use crate::fs::{DirEntry, DirectoryEnumerator};
use std::{path::Path, sync::Arc};

/**
 Fallback enumerator for targets without a fast native listing primitive.

 Only the names are taken from the listing. Every entry starts out as
 [`FileType::Unknown`](crate::FileType::Unknown), so the first type query on
 each entry costs one `lstat`.

 Available on every platform, which makes it handy for comparing against the
 native enumerator.
*/
#[derive(Debug)]
pub struct ListDir {
    inner: Option<std::fs::ReadDir>,
    path: Arc<Path>,
}

impl DirectoryEnumerator for ListDir {
    fn open(path: Arc<Path>) -> Result<Self> {
        let inner = std::fs::read_dir(&path).map_err(|e| ScanError::open(&path, e))?;
        Ok(Self {
            inner: Some(inner),
            path,
        })
    }

    fn next_entry(&mut self) -> Option<Result<DirEntry>> {
        let inner = self.inner.as_mut()?;
        // std never yields "." or ".."
        Some(match inner.next()? {
            Ok(entry) => Ok(DirEntry::unresolved(Arc::clone(&self.path), entry.file_name())),
            Err(error) => Err(ScanError::read(&self.path, error)),
        })
    }

    /// std releases the handle on drop and discards close errors, so this
    /// always succeeds.
    fn close(&mut self) -> Result<()> {
        self.inner = None;
        Ok(())
    }
}
