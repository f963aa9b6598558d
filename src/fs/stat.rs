use crate::fs::FileType;
use crate::fs::file_type::{S_IFDIR, S_IFLNK, S_IFMT, S_IFREG};
use chrono::{DateTime, Utc};

// Win32 attribute bits, kept here so the conversion is testable everywhere.
pub(crate) const FILE_ATTRIBUTE_READONLY: u32 = 0x0000_0001;
pub(crate) const FILE_ATTRIBUTE_DIRECTORY: u32 = 0x0000_0010;
pub(crate) const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x0000_0400;

/// Number of 100ns ticks between 1601-01-01 (FILETIME epoch) and 1970-01-01
const FILETIME_UNIX_EPOCH_OFFSET: u64 = 116_444_736_000_000_000;
const FILETIME_TICKS_PER_SECOND: f64 = 10_000_000.0;

/**
 Metadata for a directory entry, the equivalent of a `stat`/`lstat` record.

 Timestamps are seconds since the Unix epoch as `f64` on every platform.

 # Windows
 Entries produced by the Windows enumerator are filled from the find-data
 record the OS already returned, with no extra call. That record does not carry
 every field, so on Windows `ino`, `dev`, `nlink`, `uid` and `gid` are **always
 zero**, and `mode` is synthesised from the attribute bits
 (directory → `S_IFDIR | 0o111`, otherwise `S_IFREG`; read-only → `0o444`,
 otherwise `0o666`; reparse point → `S_IFLNK`).
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatResult {
    /// File type and permission bits
    pub mode: u32,
    /// Inode number (always 0 on Windows)
    pub ino: u64,
    /// Device id (always 0 on Windows)
    pub dev: u64,
    /// Hard link count (always 0 on Windows)
    pub nlink: u64,
    /// Owner (always 0 on Windows)
    pub uid: u32,
    /// Group (always 0 on Windows)
    pub gid: u32,
    /// Size in bytes, for symlinks the length of the link itself
    pub size: u64,
    /// Last access time
    pub atime: f64,
    /// Last modification time
    pub mtime: f64,
    /// Status change time on POSIX, creation time on Windows
    pub ctime: f64,
}

impl StatResult {
    /// The file type encoded in `mode`
    #[must_use]
    #[inline]
    pub const fn file_type(&self) -> FileType {
        FileType::from_mode(self.mode)
    }

    /// Permission bits (including setuid/setgid/sticky)
    #[must_use]
    #[inline]
    pub const fn permissions(&self) -> u32 {
        self.mode & !S_IFMT
    }

    /// Last modification time as a UTC date, `None` when out of range
    #[must_use]
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        seconds_to_datetime(self.mtime)
    }

    /// Last access time as a UTC date, `None` when out of range
    #[must_use]
    pub fn accessed(&self) -> Option<DateTime<Utc>> {
        seconds_to_datetime(self.atime)
    }

    /// `ctime` as a UTC date, `None` when out of range
    #[must_use]
    pub fn changed(&self) -> Option<DateTime<Utc>> {
        seconds_to_datetime(self.ctime)
    }

    #[cfg(unix)]
    #[allow(
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "sizes are never negative, f64 timestamps are the public contract"
    )]
    pub(crate) fn from_stat(st: &libc::stat) -> Self {
        Self {
            mode: access_stat!(st, st_mode),
            ino: access_stat!(st, st_ino),
            dev: access_stat!(st, st_dev),
            nlink: access_stat!(st, st_nlink),
            uid: access_stat!(st, st_uid),
            gid: access_stat!(st, st_gid),
            size: st.st_size as u64,
            atime: timespec_to_seconds(st.st_atime as i64, access_stat!(st, st_atime_nsec)),
            mtime: timespec_to_seconds(st.st_mtime as i64, access_stat!(st, st_mtime_nsec)),
            ctime: timespec_to_seconds(st.st_ctime as i64, access_stat!(st, st_ctime_nsec)),
        }
    }

    /// Converts a Windows find-data record, no system call involved
    #[cfg(windows)]
    pub(crate) fn from_find_data(data: &windows_sys::Win32::Storage::FileSystem::WIN32_FIND_DATAW) -> Self {
        let split = |high: u32, low: u32| (u64::from(high) << 32) | u64::from(low);
        let filetime = |ft: &windows_sys::Win32::Foundation::FILETIME| {
            filetime_to_unix(split(ft.dwHighDateTime, ft.dwLowDateTime))
        };
        Self {
            mode: attributes_to_mode(data.dwFileAttributes),
            ino: 0,
            dev: 0,
            nlink: 0,
            uid: 0,
            gid: 0,
            size: split(data.nFileSizeHigh, data.nFileSizeLow),
            atime: filetime(&data.ftLastAccessTime),
            mtime: filetime(&data.ftLastWriteTime),
            ctime: filetime(&data.ftCreationTime),
        }
    }

    /// Builds a record from std's metadata, used for stat calls on non-POSIX targets
    #[cfg(windows)]
    pub(crate) fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        use std::os::windows::fs::MetadataExt as _;
        Self {
            mode: attributes_to_mode(metadata.file_attributes()),
            ino: 0,
            dev: 0,
            nlink: 0,
            uid: 0,
            gid: 0,
            size: metadata.file_size(),
            atime: filetime_to_unix(metadata.last_access_time()),
            mtime: filetime_to_unix(metadata.last_write_time()),
            ctime: filetime_to_unix(metadata.creation_time()),
        }
    }

    /// Best effort for targets without OS-specific metadata extensions
    #[cfg(not(any(unix, windows)))]
    pub(crate) fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        let file_type = metadata.file_type();
        let kind = if file_type.is_symlink() {
            S_IFLNK
        } else if file_type.is_dir() {
            S_IFDIR | 0o111
        } else {
            S_IFREG
        };
        let perms = if metadata.permissions().readonly() { 0o444 } else { 0o666 };
        let seconds = |time: std::io::Result<std::time::SystemTime>| {
            time.ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map_or(0.0, |d| d.as_secs_f64())
        };
        Self {
            mode: kind | perms,
            ino: 0,
            dev: 0,
            nlink: 0,
            uid: 0,
            gid: 0,
            size: metadata.len(),
            atime: seconds(metadata.accessed()),
            mtime: seconds(metadata.modified()),
            ctime: seconds(metadata.created()),
        }
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "f64 timestamps are the public contract"
)]
fn timespec_to_seconds(secs: i64, nsecs: i64) -> f64 {
    secs as f64 + nsecs as f64 / 1e9
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "fraction is in [0, 1) so nanos fit a u32"
)]
fn seconds_to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos)
}

/// Synthesises POSIX mode bits from Win32 file attributes
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) const fn attributes_to_mode(attributes: u32) -> u32 {
    let mut mode = if attributes & FILE_ATTRIBUTE_DIRECTORY != 0 {
        S_IFDIR | 0o111
    } else {
        S_IFREG
    };
    mode |= if attributes & FILE_ATTRIBUTE_READONLY != 0 {
        0o444
    } else {
        0o666
    };
    if attributes & FILE_ATTRIBUTE_REPARSE_POINT != 0 {
        mode = (mode & !S_IFMT) | S_IFLNK;
    }
    mode
}

/// Converts a FILETIME (100ns ticks since 1601) to seconds since the Unix epoch.
/// Times before 1970 come out negative rather than being clamped.
#[cfg_attr(not(windows), allow(dead_code))]
#[allow(
    clippy::cast_precision_loss,
    reason = "f64 timestamps are the public contract"
)]
pub(crate) fn filetime_to_unix(ticks: u64) -> f64 {
    if ticks >= FILETIME_UNIX_EPOCH_OFFSET {
        (ticks - FILETIME_UNIX_EPOCH_OFFSET) as f64 / FILETIME_TICKS_PER_SECOND
    } else {
        -((FILETIME_UNIX_EPOCH_OFFSET - ticks) as f64 / FILETIME_TICKS_PER_SECOND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filetime_uses_unix_epoch() {
        assert_eq!(filetime_to_unix(FILETIME_UNIX_EPOCH_OFFSET), 0.0);
        // 2009-02-13T23:31:30Z
        let ticks = FILETIME_UNIX_EPOCH_OFFSET + 1_234_567_890 * 10_000_000 + 5_000_000;
        assert!((filetime_to_unix(ticks) - 1_234_567_890.5).abs() < 1e-6);
        assert!(filetime_to_unix(0) < 0.0);
    }

    #[test]
    fn attributes_synthesise_mode() {
        let dir = attributes_to_mode(FILE_ATTRIBUTE_DIRECTORY);
        assert_eq!(FileType::from_mode(dir), FileType::Directory);
        assert_eq!(dir & 0o777, 0o777);

        let ro_file = attributes_to_mode(FILE_ATTRIBUTE_READONLY);
        assert_eq!(FileType::from_mode(ro_file), FileType::RegularFile);
        assert_eq!(ro_file & 0o777, 0o444);

        let link = attributes_to_mode(FILE_ATTRIBUTE_REPARSE_POINT | FILE_ATTRIBUTE_DIRECTORY);
        assert_eq!(FileType::from_mode(link), FileType::Symlink);
    }

    #[test]
    fn timestamps_convert_to_dates() {
        let stat = StatResult {
            mode: S_IFREG | 0o644,
            ino: 1,
            dev: 1,
            nlink: 1,
            uid: 0,
            gid: 0,
            size: 4,
            atime: 0.0,
            mtime: 1_234_567_890.25,
            ctime: f64::NAN,
        };
        let modified = stat.modified().map(|d| d.timestamp());
        assert_eq!(modified, Some(1_234_567_890));
        assert!(stat.changed().is_none());
        assert_eq!(stat.permissions(), 0o644);
        assert_eq!(stat.file_type(), FileType::RegularFile);
    }
}
