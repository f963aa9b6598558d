/*!
 Directory entries as yielded by [`scandir`](crate::scandir).

 An entry knows its name, the directory it was found in, and whatever type
 information the OS handed out for free while enumerating. Anything more
 (size, timestamps, permission bits) is fetched on demand with a single
 `lstat` and then cached.

 # Examples
 ```
 use std::fs::{self, File};
 use std::io::Write;

 let dir = tempfile::tempdir().unwrap();
 fs::create_dir(dir.path().join("subdir")).unwrap();
 File::create(dir.path().join("file1.txt")).unwrap().write_all(b"data").unwrap();

 let mut seen: Vec<(std::ffi::OsString, bool)> = Vec::new();
 for entry in scandir::scandir(dir.path()).unwrap() {
     let entry = entry.unwrap();
     if entry.is_file() {
         assert_eq!(entry.lstat().unwrap().size, 4);
     }
     seen.push((entry.name().to_owned(), entry.is_dir()));
 }
 seen.sort();
 assert_eq!(seen, vec![("file1.txt".into(), false), ("subdir".into(), true)]);
 ```
*/

use crate::error::{Result, ScanError};
use crate::fs::{FileType, StatResult};
use crate::sys;
use chrono::{DateTime, Utc};
use core::cell::{Cell, OnceCell};
use core::fmt;
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    sync::Arc,
};

/**
  A single entry of a directory listing.

  - **Directory**: shared `Arc<Path>` of the directory being scanned, so a
    listing allocates the parent path once.
  - **Name**: the entry's base name, never `.` or `..`.
  - **File type**: a `Cell<FileType>`, seeded from the enumeration call and
    resolved at most once with `lstat` when the OS reported `Unknown`.
  - **lstat cache**: a `OnceCell<StatResult>`, filled on first use.
  - **is traversible cache**: `Cell<Option<bool>>`, avoids re-statting symlink targets.

  The caches use interior mutability without locking, so a `DirEntry` can be
  moved to another thread (`Send`) but not shared between threads (`!Sync`).
*/
#[derive(Clone)]
pub struct DirEntry {
    pub(crate) dir: Arc<Path>,
    pub(crate) name: OsString,
    pub(crate) file_type: Cell<FileType>,
    pub(crate) lstat: OnceCell<StatResult>,
    /// `None` means not computed yet, `Some(bool)` means cached result.
    pub(crate) is_traversible_cache: Cell<Option<bool>>,
}

impl DirEntry {
    /// Builds an entry from an inline type tag (`d_type` on POSIX).
    #[inline]
    pub(crate) fn from_dtype(dir: Arc<Path>, name: OsString, file_type: FileType) -> Self {
        Self {
            dir,
            name,
            file_type: Cell::new(file_type),
            lstat: OnceCell::new(),
            is_traversible_cache: Cell::new(None),
        }
    }

    /// Builds an entry whose metadata is already known (Windows find data).
    #[inline]
    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn from_stat(dir: Arc<Path>, name: OsString, stat: StatResult) -> Self {
        Self {
            dir,
            name,
            file_type: Cell::new(stat.file_type()),
            lstat: OnceCell::from(stat),
            is_traversible_cache: Cell::new(None),
        }
    }

    /// Builds an entry with no type information at all, every type query
    /// goes through `lstat` once.
    #[inline]
    pub(crate) fn unresolved(dir: Arc<Path>, name: OsString) -> Self {
        Self::from_dtype(dir, name, FileType::Unknown)
    }

    /// The entry's base name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// The directory this entry was found in
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The directory joined with the entry name
    #[inline]
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    /**
    Returns the file type without following symlinks.

    Free when the enumeration call supplied the type. Otherwise this performs
    one `lstat` (shared with [`DirEntry::lstat`]) and caches the derived type.

    # Errors
    Returns [`ScanError::Stat`] if the fallback `lstat` fails.
    */
    #[inline]
    pub fn file_type(&self) -> Result<FileType> {
        let cached = self.file_type.get();
        if !cached.is_unknown() {
            return Ok(cached);
        }

        tracing::trace!(path = %self.path().display(), "no inline type, falling back to lstat");
        let resolved = self.lstat()?.file_type();
        self.file_type.set(resolved);
        Ok(resolved)
    }

    /// The type as currently known, never triggers a system call
    #[inline]
    #[must_use]
    pub fn cached_file_type(&self) -> FileType {
        self.file_type.get()
    }

    /// True for directories (not symlinks to directories). Never fails, a
    /// failed stat reports `false`.
    #[inline]
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.file_type().is_ok_and(FileType::is_dir)
    }

    /// True for regular files. Never fails, a failed stat reports `false`.
    #[inline]
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.file_type().is_ok_and(FileType::is_regular_file)
    }

    /// True for symlinks, dangling or not. Never fails, a failed stat reports `false`.
    #[inline]
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.file_type().is_ok_and(FileType::is_symlink)
    }

    /**
    Returns the entry's metadata without following symlinks.

    The first call performs `lstat(dir/name)` (nothing on Windows, where the
    find call already returned the data); every later call returns the same
    cached record.

    # Errors
    Returns [`ScanError::Stat`] with the OS error if the stat fails, for
    example when the entry was removed after the listing.
    */
    #[inline]
    pub fn lstat(&self) -> Result<&StatResult> {
        if let Some(stat) = self.lstat.get() {
            return Ok(stat);
        }
        let stat = sys::lstat(&self.path())?;
        Ok(self.lstat.get_or_init(|| stat))
    }

    /**
    Returns the entry's metadata, following symlinks.

    For anything but a symlink this is the cached [`DirEntry::lstat`] record.
    For symlinks the target is stat'ed on every call.

    # Errors
    Returns [`ScanError::Stat`] if the target does not exist (dangling link)
    or cannot be reached.
    */
    #[inline]
    pub fn stat(&self) -> Result<StatResult> {
        if self.file_type()?.is_symlink() {
            sys::stat(&self.path())
        } else {
            self.lstat().copied()
        }
    }

    /// Checks if the entry is a directory or a symlink to one, caching the result.
    #[inline]
    #[must_use]
    pub fn is_traversible(&self) -> bool {
        if let Some(cached) = self.is_traversible_cache.get() {
            return cached;
        }

        let is_traversible = match self.file_type() {
            Ok(FileType::Directory) => true,
            Ok(FileType::Symlink) => self.stat().is_ok_and(|st| st.file_type().is_dir()),
            _ => false,
        };

        self.is_traversible_cache.set(Some(is_traversible));
        is_traversible
    }

    /// Checks if the name starts with a dot
    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.name.as_encoded_bytes().first() == Some(&b'.')
    }

    /**
      Returns the last modification time of the entry in UTC.

     Uses the cached `lstat` record, so for a symlink this is the time of the
     link itself rather than of its target.

     # Errors
     Returns an [`Err`] if the `lstat` call fails or the timestamp cannot be
     represented as a [`DateTime<Utc>`].
    */
    #[inline]
    pub fn modified_time(&self) -> Result<DateTime<Utc>> {
        self.lstat()?.modified().ok_or(ScanError::TimeOutOfRange)
    }
}

impl fmt::Display for DirEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

impl fmt::Debug for DirEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirEntry")
            .field("dir", &self.dir)
            .field("name", &self.name)
            .field("file_type", &self.file_type.get())
            .field("lstat", &self.lstat.get())
            .field("traversible_cache", &self.is_traversible_cache.get())
            .finish()
    }
}

impl From<DirEntry> for PathBuf {
    #[inline]
    fn from(entry: DirEntry) -> Self {
        entry.path()
    }
}
