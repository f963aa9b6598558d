use crate::error::{Result, ScanError};
use crate::fs::{DirEntry, DirectoryEnumerator, StatResult};
use std::{
    ffi::OsString,
    io,
    os::windows::ffi::{OsStrExt as _, OsStringExt as _},
    path::Path,
    sync::Arc,
};
use windows_sys::Win32::{
    Foundation::{ERROR_FILE_NOT_FOUND, ERROR_NO_MORE_FILES, GetLastError, HANDLE, INVALID_HANDLE_VALUE},
    Storage::FileSystem::{FindClose, FindFirstFileW, FindNextFileW, WIN32_FIND_DATAW},
};

/**
 Windows directory enumerator using `FindFirstFileW`/`FindNextFileW`/`FindClose`.

 The find-data record already carries the attributes, size and all three file
 times, so every yielded entry arrives with its type and `lstat` record filled
 in and never needs another system call.
*/
pub struct FindFiles {
    /// Search handle, `None` once closed or when the directory was empty
    handle: Option<HANDLE>,
    /// Record returned by `FindFirstFileW`, consumed by the first `next_entry`
    pending: Option<Box<WIN32_FIND_DATAW>>,
    /// The directory being read, shared with every entry yielded
    path: Arc<Path>,
}

// SAFETY: the search handle is exclusively owned and never aliased.
unsafe impl Send for FindFiles {}

// windows-sys structs don't implement Debug
impl core::fmt::Debug for FindFiles {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FindFiles")
            .field("handle", &self.handle)
            .field("pending", &self.pending.is_some())
            .field("path", &self.path)
            .finish()
    }
}

#[allow(clippy::cast_possible_wrap)]
fn last_error() -> io::Error {
    // SAFETY: always safe
    io::Error::from_raw_os_error(unsafe { GetLastError() } as i32)
}

fn empty_find_data() -> Box<WIN32_FIND_DATAW> {
    // SAFETY: WIN32_FIND_DATAW is plain integers and arrays, all zeroes is valid
    Box::new(unsafe { core::mem::zeroed() })
}

/// `dir\*` as a NUL-terminated wide string
fn search_pattern(path: &Path) -> io::Result<Vec<u16>> {
    let mut wide: Vec<u16> = path.as_os_str().encode_wide().collect();
    if wide.contains(&0) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path contains an interior nul byte",
        ));
    }
    if !matches!(wide.last(), Some(&sep) if sep == u16::from(b'\\') || sep == u16::from(b'/')) {
        wide.push(u16::from(b'\\'));
    }
    wide.push(u16::from(b'*'));
    wide.push(0);
    Ok(wide)
}

fn file_name(data: &WIN32_FIND_DATAW) -> OsString {
    let len = data
        .cFileName
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(data.cFileName.len());
    OsString::from_wide(&data.cFileName[..len])
}

fn is_dot_or_dot_dot(data: &WIN32_FIND_DATAW) -> bool {
    const DOT: u16 = b'.' as u16;
    matches!(data.cFileName, [DOT, 0, ..] | [DOT, DOT, 0, ..])
}

impl DirectoryEnumerator for FindFiles {
    fn open(path: Arc<Path>) -> Result<Self> {
        let pattern = search_pattern(&path).map_err(|e| ScanError::open(&path, e))?;
        let mut data = empty_find_data();

        // SAFETY: the pattern is NUL terminated and `data` is a valid out pointer
        let handle = unsafe { FindFirstFileW(pattern.as_ptr(), &raw mut *data) };

        if handle == INVALID_HANDLE_VALUE {
            // SAFETY: always safe
            let code = unsafe { GetLastError() };
            // No match for `*` means an empty directory, not an error.
            if code == ERROR_FILE_NOT_FOUND {
                return Ok(Self {
                    handle: None,
                    pending: None,
                    path,
                });
            }
            #[allow(clippy::cast_possible_wrap)]
            let error = io::Error::from_raw_os_error(code as i32);
            return Err(ScanError::open(&path, error));
        }

        Ok(Self {
            handle: Some(handle),
            pending: Some(data),
            path,
        })
    }

    fn next_entry(&mut self) -> Option<Result<DirEntry>> {
        loop {
            let data = if let Some(first) = self.pending.take() {
                first
            } else {
                let handle = self.handle?;
                let mut data = empty_find_data();
                // SAFETY: the handle is live and `data` is a valid out pointer
                if unsafe { FindNextFileW(handle, &raw mut *data) } == 0 {
                    // SAFETY: always safe
                    if unsafe { GetLastError() } == ERROR_NO_MORE_FILES {
                        return None;
                    }
                    return Some(Err(ScanError::read(&self.path, last_error())));
                }
                data
            };

            if is_dot_or_dot_dot(&data) {
                continue;
            }

            return Some(Ok(DirEntry::from_stat(
                Arc::clone(&self.path),
                file_name(&data),
                StatResult::from_find_data(&data),
            )));
        }
    }

    fn close(&mut self) -> Result<()> {
        self.pending = None;
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        // SAFETY: taken out of the Option, so this is the only FindClose for this handle
        if unsafe { FindClose(handle) } == 0 {
            return Err(ScanError::close(&self.path, last_error()));
        }
        Ok(())
    }
}

impl Drop for FindFiles {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
