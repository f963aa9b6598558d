use crate::{
    ScanError,
    fs::{DirEntry, DirectoryEnumerator, NativeEnumerator, ScanDir},
    walk::{ErrorCallback, WalkBuilder},
};
use core::marker::PhantomData;
use std::{
    collections::HashMap,
    ffi::OsString,
    path::{Path, PathBuf},
    sync::Arc,
};

/// One directory visited by a [`Walk`].
///
/// `dirnames` holds every entry that is a directory or a symlink to one,
/// `filenames` everything else. Both keep the order the OS listed them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirLevel {
    /// The directory, the walk root joined with the names descended through
    pub path: PathBuf,
    pub dirnames: Vec<OsString>,
    pub filenames: Vec<OsString>,
}

impl From<DirLevel> for (PathBuf, Vec<OsString>, Vec<OsString>) {
    #[inline]
    fn from(level: DirLevel) -> Self {
        (level.path, level.dirnames, level.filenames)
    }
}

enum Task {
    /// List this directory
    Scan(PathBuf),
    /// Bottom-up only: every subdirectory has been visited, yield the level
    Emit(DirLevel),
}

/// The level handed out last, kept until the caller asks for the next one so
/// edits to `dirnames` can steer the descent.
struct Visited {
    level: DirLevel,
    /// Directory entries by name, `None` for bottom-up levels whose children are already done
    subdirs: Option<HashMap<OsString, DirEntry>>,
}

/**
 Recursive directory walk built on [`scandir`](crate::scandir).

 Yields one [`DirLevel`] per directory, depth first. Each directory is listed
 once and classified from the entry types the listing handed out, so on most
 platforms a walk costs one `opendir` per directory and a `stat` only for
 symlinks.

 # Pruning
 In top-down mode (the default), the `dirnames` of the level returned by
 [`Walk::next_level`] may be edited before the next call: removed names are
 not visited, added names are visited if they exist by then. Symlinks among
 them are only descended into with [`WalkBuilder::follow_links`].

 # Errors
 A directory that fails to list, at open, mid-read or on close, yields no
 level. Its error goes to the [`WalkBuilder::on_error`] callback, if any, and
 the walk continues with the next directory.

 # Examples
 ```
 use scandir::walk;

 let dir = tempfile::tempdir().unwrap();
 std::fs::create_dir_all(dir.path().join("keep/inner")).unwrap();
 std::fs::create_dir_all(dir.path().join("skip/inner")).unwrap();

 let mut walk = walk(dir.path());
 let mut visited = 0;
 while let Some(level) = walk.next_level() {
     level.dirnames.retain(|name| name != "skip");
     visited += 1;
 }
 // root, keep, keep/inner
 assert_eq!(visited, 3);
 ```
*/
pub struct Walk<'a, E: DirectoryEnumerator = NativeEnumerator> {
    stack: Vec<Task>,
    current: Option<Visited>,
    topdown: bool,
    follow_links: bool,
    on_error: Option<ErrorCallback<'a>>,
    _enumerator: PhantomData<fn() -> E>,
}

impl<'a> Walk<'a> {
    /// Starts configuring a walk from `root`, see [`WalkBuilder`]
    #[inline]
    pub fn builder<P: AsRef<Path>>(root: P) -> WalkBuilder<'a> {
        WalkBuilder::new(root)
    }
}

impl<'a, E: DirectoryEnumerator> Walk<'a, E> {
    pub(crate) fn from_builder(builder: WalkBuilder<'a, E>) -> Self {
        Self {
            stack: vec![Task::Scan(builder.root)],
            current: None,
            topdown: builder.topdown,
            follow_links: builder.follow_links,
            on_error: builder.on_error,
            _enumerator: PhantomData,
        }
    }

    /**
    Advances to the next directory and lends out its level.

    The returned level stays borrowed until the next call, which is when a
    top-down walk reads back `dirnames` to decide where to descend. Returns
    `None` once every reachable directory has been visited.
    */
    pub fn next_level(&mut self) -> Option<&mut DirLevel> {
        if let Some(visited) = self.current.take() {
            if let Some(subdirs) = visited.subdirs {
                let children = self.descend_into(&visited.level, &subdirs);
                self.push_children(children);
            }
        }

        loop {
            match self.stack.pop()? {
                Task::Emit(level) => {
                    let visited = self.current.insert(Visited {
                        level,
                        subdirs: None,
                    });
                    return Some(&mut visited.level);
                }
                Task::Scan(path) => {
                    let Some((level, subdirs)) = self.scan(path) else {
                        continue;
                    };

                    if self.topdown {
                        let visited = self.current.insert(Visited {
                            level,
                            subdirs: Some(subdirs),
                        });
                        return Some(&mut visited.level);
                    }

                    let children = self.descend_into(&level, &subdirs);
                    self.stack.push(Task::Emit(level));
                    self.push_children(children);
                }
            }
        }
    }

    /// Lists one directory, routing any failure to the error callback.
    fn scan(&mut self, path: PathBuf) -> Option<(DirLevel, HashMap<OsString, DirEntry>)> {
        let entries = match ScanDir::<E>::open(&path) {
            Ok(entries) => entries,
            Err(error) => {
                self.report(error);
                return None;
            }
        };

        let mut dirnames = Vec::new();
        let mut filenames = Vec::new();
        let mut subdirs = HashMap::new();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    self.report(error);
                    return None;
                }
            };

            if entry.is_traversible() {
                dirnames.push(entry.name.clone());
                subdirs.insert(entry.name.clone(), entry);
            } else {
                filenames.push(entry.name);
            }
        }

        Some((
            DirLevel {
                path,
                dirnames,
                filenames,
            },
            subdirs,
        ))
    }

    /// Paths of the subdirectories to visit, in `dirnames` order.
    fn descend_into(&self, level: &DirLevel, subdirs: &HashMap<OsString, DirEntry>) -> Vec<PathBuf> {
        let mut parent: Option<Arc<Path>> = None;

        level
            .dirnames
            .iter()
            .filter(|name| {
                if self.follow_links {
                    return true;
                }
                let is_symlink = match subdirs.get(*name) {
                    Some(entry) => entry.is_symlink(),
                    // added by the caller after the listing
                    None => {
                        let dir = parent.get_or_insert_with(|| Arc::from(level.path.as_path()));
                        DirEntry::unresolved(Arc::clone(dir), (*name).clone()).is_symlink()
                    }
                };
                if is_symlink {
                    tracing::debug!(
                        path = %level.path.join(name).display(),
                        "not following symlink"
                    );
                }
                !is_symlink
            })
            .map(|name| level.path.join(name))
            .collect()
    }

    fn push_children(&mut self, children: Vec<PathBuf>) {
        // reversed so the first name is popped first
        self.stack.extend(children.into_iter().rev().map(Task::Scan));
    }

    fn report(&mut self, error: ScanError) {
        tracing::debug!(%error, "skipping directory");
        if let Some(on_error) = self.on_error.as_mut() {
            on_error(error);
        }
    }
}

/// Yields owned copies of each level. Pruning needs [`Walk::next_level`].
impl<E: DirectoryEnumerator> Iterator for Walk<'_, E> {
    type Item = DirLevel;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.next_level().map(|level| level.clone())
    }
}

impl<E: DirectoryEnumerator> core::iter::FusedIterator for Walk<'_, E> {}

impl<E: DirectoryEnumerator> core::fmt::Debug for Walk<'_, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Walk")
            .field("pending", &self.stack.len())
            .field("current", &self.current.as_ref().map(|visited| &visited.level.path))
            .field("topdown", &self.topdown)
            .field("follow_links", &self.follow_links)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
