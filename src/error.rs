use std::{io, path::Path, path::PathBuf};
use thiserror::Error;

/**
An error produced while enumerating a directory or fetching entry metadata.

Every OS-level variant keeps the path it happened at and the original
[`io::Error`], so the errno survives all the way to the caller
(see [`ScanError::raw_os_error`]).
*/
#[derive(Debug, Error)]
pub enum ScanError {
    /// The directory could not be opened (missing, not a directory, access denied, ...)
    #[error("cannot open directory {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A read-next-entry call failed part way through the directory
    #[error("cannot read directory {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Releasing the directory handle failed
    #[error("cannot close directory {}: {source}", path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A metadata fetch (`lstat`/`stat`) failed
    #[error("cannot stat {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path cannot be handed to the OS because it holds a NUL byte
    #[error("path contains an interior nul byte: {}", .0.display())]
    InteriorNul(PathBuf),

    /// A timestamp could not be represented as a date
    #[error("timestamp out of range")]
    TimeOutOfRange,
}

impl ScanError {
    /// The path this error occurred at, if applicable.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Open { path, .. }
            | Self::Read { path, .. }
            | Self::Close { path, .. }
            | Self::Stat { path, .. }
            | Self::InteriorNul(path) => Some(path),
            Self::TimeOutOfRange => None,
        }
    }

    /// The underlying OS error, if this error came from a system call.
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Open { source, .. }
            | Self::Read { source, .. }
            | Self::Close { source, .. }
            | Self::Stat { source, .. } => Some(source),
            Self::InteriorNul(_) | Self::TimeOutOfRange => None,
        }
    }

    /// The raw errno (or Win32 error code) behind this error.
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        self.io_error().and_then(io::Error::raw_os_error)
    }

    /// The [`io::ErrorKind`] of the underlying error.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::InteriorNul(_) => io::ErrorKind::InvalidInput,
            Self::TimeOutOfRange => io::ErrorKind::InvalidData,
            _ => self.io_error().map_or(io::ErrorKind::Other, io::Error::kind),
        }
    }

    pub(crate) fn open(path: &Path, source: io::Error) -> Self {
        Self::Open {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn close(path: &Path, source: io::Error) -> Self {
        Self::Close {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn stat(path: &Path, source: io::Error) -> Self {
        Self::Stat {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<ScanError> for io::Error {
    fn from(error: ScanError) -> Self {
        match error {
            ScanError::Open { source, .. }
            | ScanError::Read { source, .. }
            | ScanError::Close { source, .. }
            | ScanError::Stat { source, .. } => source,
            other => Self::new(other.kind(), other),
        }
    }
}

/// Generic result type for directory scanning operations
pub type Result<T> = core::result::Result<T, ScanError>;
