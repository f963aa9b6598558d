//! Platform backends, selected at compile time.

use crate::error::{Result, ScanError};
use crate::fs::StatResult;
use std::path::Path;

mod generic;
pub use generic::ListDir;

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
mod unix;
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
pub use unix::ReadDir;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::FindFiles;

/// The enumerator [`scandir`](crate::scandir) uses on this target
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
pub type NativeEnumerator = ReadDir;

/// The enumerator [`scandir`](crate::scandir) uses on this target
#[cfg(windows)]
pub type NativeEnumerator = FindFiles;

/// The enumerator [`scandir`](crate::scandir) uses on this target
#[cfg(not(any(
    windows,
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
pub type NativeEnumerator = ListDir;

// Per-thread syscall counters, tests run one per thread so they don't interfere.
#[cfg(test)]
thread_local! {
    pub(crate) static LSTAT_CALLS: core::cell::Cell<usize> = const { core::cell::Cell::new(0) };
    pub(crate) static STAT_CALLS: core::cell::Cell<usize> = const { core::cell::Cell::new(0) };
}

/// `lstat(path)`, does not follow a trailing symlink
pub(crate) fn lstat(path: &Path) -> Result<StatResult> {
    #[cfg(test)]
    LSTAT_CALLS.with(|calls| calls.set(calls.get() + 1));

    #[cfg(unix)]
    let result = {
        let c_path = cstring(path)?;
        stat_syscall!(lstat, c_path.as_ptr()).map(|st| StatResult::from_stat(&st))
    };
    #[cfg(not(unix))]
    let result = {
        reject_nul(path)?;
        std::fs::symlink_metadata(path).map(|metadata| StatResult::from_metadata(&metadata))
    };

    result.map_err(|e| ScanError::stat(path, e))
}

/// `stat(path)`, follows symlinks
pub(crate) fn stat(path: &Path) -> Result<StatResult> {
    #[cfg(test)]
    STAT_CALLS.with(|calls| calls.set(calls.get() + 1));

    #[cfg(unix)]
    let result = {
        let c_path = cstring(path)?;
        stat_syscall!(stat, c_path.as_ptr()).map(|st| StatResult::from_stat(&st))
    };
    #[cfg(not(unix))]
    let result = {
        reject_nul(path)?;
        std::fs::metadata(path).map(|metadata| StatResult::from_metadata(&metadata))
    };

    result.map_err(|e| ScanError::stat(path, e))
}

/// No platform accepts a NUL byte inside a path.
pub(crate) fn reject_nul(path: &Path) -> Result<()> {
    if path.as_os_str().as_encoded_bytes().contains(&0) {
        return Err(ScanError::InteriorNul(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(unix)]
pub(crate) fn cstring(path: &Path) -> Result<std::ffi::CString> {
    use std::os::unix::ffi::OsStrExt as _;
    std::ffi::CString::new(path.as_os_str().as_bytes())
        .map_err(|_| ScanError::InteriorNul(path.to_path_buf()))
}
