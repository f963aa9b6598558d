/*!
 Fast directory listing that hands out the entry types the OS already knows.

 [`scandir`] lists one directory lazily. Every [`DirEntry`] carries the type
 reported by the listing call itself (`d_type` on POSIX, the find-data record
 on Windows), so asking "is this a directory?" usually costs no extra system
 call. Metadata is fetched with a single `lstat` on first request and cached.

 [`walk`] builds a recursive, `os.walk`-style tree walk on top of it, yielding
 one [`DirLevel`] of `(path, dirnames, filenames)` per directory.

 # Examples
 ```
 use std::fs;

 let dir = tempfile::tempdir().unwrap();
 fs::write(dir.path().join("file1.txt"), b"data").unwrap();
 fs::write(dir.path().join("file2.txt"), b"moredata").unwrap();
 fs::create_dir(dir.path().join("subdir")).unwrap();

 let mut total = 0;
 for entry in scandir::scandir(dir.path()).unwrap() {
     let entry = entry.unwrap();
     if entry.is_file() {
         total += entry.lstat().unwrap().size;
     }
 }
 assert_eq!(total, 12);

 let levels: Vec<_> = scandir::walk(dir.path()).collect();
 assert_eq!(levels.len(), 2);
 assert_eq!(levels[0].dirnames, [std::ffi::OsString::from("subdir")]);
 ```
*/

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::undocumented_unsafe_blocks)]
#![allow(clippy::redundant_pub_crate)]
#![allow(clippy::inline_always)]

#[cfg(unix)]
#[macro_use]
mod macros;

mod error;
pub mod fs;
mod sys;
pub mod walk;


pub use error::{Result, ScanError};
pub use fs::{DirEntry, DirectoryEnumerator, FileType, ScanDir, StatResult};
pub use walk::{DirLevel, Walk, WalkBuilder};

use std::path::Path;

/**
 Opens `path` and returns a lazy iterator over its entries, `.` and `..` excluded.

 The directory is opened immediately so a missing or unreadable path fails
 here rather than on the first `next()`. Entry order is whatever the OS
 returns. An empty path lists the current directory.

 # Errors
 Returns [`ScanError::Open`] if the directory cannot be opened. The
 underlying errno is available through [`ScanError::raw_os_error`].
 A path containing a NUL byte is rejected with [`ScanError::InteriorNul`]
 before any system call.
*/
#[inline]
pub fn scandir<P: AsRef<Path>>(path: P) -> Result<ScanDir> {
    ScanDir::open(path.as_ref())
}

/**
 Like [`scandir`] but with an explicit [`DirectoryEnumerator`].

 ```
 use scandir::fs::ListDir;

 let dir = tempfile::tempdir().unwrap();
 std::fs::create_dir(dir.path().join("a")).unwrap();

 let entries: Vec<_> = scandir::scandir_with::<ListDir, _>(dir.path())
     .unwrap()
     .collect::<Result<_, _>>()
     .unwrap();
 // ListDir learns the type through lstat
 assert!(entries[0].cached_file_type().is_unknown());
 assert!(entries[0].is_dir());
 ```

 # Errors
 Returns [`ScanError::Open`] if the directory cannot be opened.
*/
#[inline]
pub fn scandir_with<E, P>(path: P) -> Result<ScanDir<E>>
where
    E: DirectoryEnumerator,
    P: AsRef<Path>,
{
    ScanDir::open(path.as_ref())
}

/// Walks the tree under `top` with the default options: top-down, errors
/// ignored, symlinks not followed. Use [`Walk::builder`] to change them.
#[inline]
pub fn walk<P: AsRef<Path>>(top: P) -> Walk<'static> {
    WalkBuilder::new(top).build()
}
