use crate::error::{Result, ScanError};
use crate::fs::{DirEntry, DirectoryEnumerator, FileType};
use core::ffi::CStr;
use core::ptr::NonNull;
use libc::DIR;
use std::{ffi::OsStr, io, os::unix::ffi::OsStrExt as _, path::Path, sync::Arc};

#[cfg(all(target_os = "linux", target_env = "gnu"))]
use libc::{dirent64, readdir64};

#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
use libc::{dirent as dirent64, readdir as readdir64};

/**
 POSIX directory enumerator using libc's `opendir`/`readdir`/`closedir`.

 The entry type comes straight from `d_type`. Entries on filesystems that
 report `DT_UNKNOWN` (some network and FUSE filesystems) keep
 [`FileType::Unknown`] and are resolved with `lstat` when first queried.
*/
#[derive(Debug)]
pub struct ReadDir {
    /// Raw directory pointer from libc's `opendir()`, `None` once closed
    dir: Option<NonNull<DIR>>,
    /// The directory being read, shared with every entry yielded
    path: Arc<Path>,
}

// SAFETY: the DIR stream is exclusively owned and never aliased, moving it to
// another thread between calls is fine.
unsafe impl Send for ReadDir {}

impl ReadDir {
    /**
     Opens a directory stream for reading directory entries.

     # Errors
     Returns an error if:
     - The directory doesn't exist or can't be opened
     - The path doesn't point to a directory
     - Permission is denied
     - System resources are exhausted
    */
    fn opendir(path: &CStr) -> io::Result<NonNull<DIR>> {
        // SAFETY: we are passing a null terminated directory to opendir
        let dir = unsafe { libc::opendir(path.as_ptr()) };

        let Some(dir) = NonNull::new(dir) else {
            return_os_error!()
        };
        Ok(dir)
    }

    /// Constructs a `DirEntry` from a raw directory entry pointer
    ///
    /// # Safety
    /// `drnt` must be a valid, non-null pointer returned by `readdir`, not yet
    /// invalidated by another call on the same stream.
    #[inline]
    unsafe fn construct_entry(&self, drnt: *const dirent64) -> DirEntry {
        // SAFETY: valid per the function contract, d_name is NUL terminated
        let name = unsafe { CStr::from_ptr(access_dirent!(drnt, d_name).cast()) };
        // SAFETY: as above
        let d_type = unsafe { access_dirent!(drnt, d_type) };

        DirEntry::from_dtype(
            Arc::clone(&self.path),
            OsStr::from_bytes(name.to_bytes()).to_owned(),
            FileType::from_dtype(d_type),
        )
    }
}

impl DirectoryEnumerator for ReadDir {
    #[inline]
    fn open(path: Arc<Path>) -> Result<Self> {
        let c_path = super::cstring(&path)?;
        let dir = Self::opendir(&c_path).map_err(|e| ScanError::open(&path, e))?;
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    /**
    Reads entries with `readdir` until it finds one that isn't "." or "..".

    `readdir` returns NULL both at the end of the stream and on error, the two
    are told apart by clearing `errno` before the call.
    */
    #[inline]
    fn next_entry(&mut self) -> Option<Result<DirEntry>> {
        let dir = self.dir?;
        loop {
            set_errno(0);
            // SAFETY: `dir` is a live stream owned by this iterator
            let drnt: *mut dirent64 = unsafe { readdir64(dir.as_ptr()) };

            if drnt.is_null() {
                let error = io::Error::last_os_error();
                return match error.raw_os_error() {
                    Some(0) | None => None,
                    Some(_) => Some(Err(ScanError::read(&self.path, error))),
                };
            }

            skip_dot_or_dot_dot_entries!(drnt, continue);
            // SAFETY: checked non-null above, and we're done with it before the next readdir
            return Some(Ok(unsafe { self.construct_entry(drnt) }));
        }
    }

    #[inline]
    fn close(&mut self) -> Result<()> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };
        // SAFETY: taken out of the Option, so this is the only closedir for this stream
        if unsafe { libc::closedir(dir.as_ptr()) } != 0 {
            return Err(ScanError::close(&self.path, io::Error::last_os_error()));
        }
        Ok(())
    }
}

impl Drop for ReadDir {
    /**
    Closes the directory stream if nobody did, to prevent resource leaks.

    File descriptors are limited system resources, so proper cleanup
    is essential. Errors can't be reported from here, `ScanDir` closes
    explicitly beforehand and logs them.
    */
    #[inline]
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[inline]
fn set_errno(value: libc::c_int) {
    // SAFETY: the errno location is thread local and always valid
    unsafe {
        #[cfg(target_os = "linux")]
        {
            *libc::__errno_location() = value;
        }
        #[cfg(any(target_os = "android", target_os = "netbsd", target_os = "openbsd"))]
        {
            *libc::__errno() = value;
        }
        #[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
        {
            *libc::__error() = value;
        }
    }
}
