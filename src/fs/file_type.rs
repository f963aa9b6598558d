use core::fmt;

// POSIX file type bits. These values are fixed by every Unix we run on, and
// the Windows backend synthesises mode bits with the same encoding.
pub(crate) const S_IFMT: u32 = 0o170_000;
pub(crate) const S_IFSOCK: u32 = 0o140_000;
pub(crate) const S_IFLNK: u32 = 0o120_000;
pub(crate) const S_IFREG: u32 = 0o100_000;
pub(crate) const S_IFBLK: u32 = 0o060_000;
pub(crate) const S_IFDIR: u32 = 0o040_000;
pub(crate) const S_IFCHR: u32 = 0o020_000;
pub(crate) const S_IFIFO: u32 = 0o010_000;

/**
 Represents the type of a directory entry.

 `Unknown` means the OS did not tell us the type inline (POSIX `DT_UNKNOWN`),
 it is *not* a catch-all for "neither file nor directory": FIFOs, sockets and
 devices all have their own variants.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileType {
    BlockDevice,
    CharDevice,
    Directory,
    Fifo,
    Symlink,
    RegularFile,
    Socket,
    Unknown,
}

impl FileType {
    /// Converts a `libc` `d_type` tag to a `FileType`
    #[must_use]
    #[inline]
    #[cfg(unix)]
    pub const fn from_dtype(d_type: u8) -> Self {
        match d_type {
            libc::DT_DIR => Self::Directory,
            libc::DT_REG => Self::RegularFile,
            libc::DT_BLK => Self::BlockDevice,
            libc::DT_CHR => Self::CharDevice,
            libc::DT_FIFO => Self::Fifo,
            libc::DT_LNK => Self::Symlink,
            libc::DT_SOCK => Self::Socket,
            _ => Self::Unknown,
        }
    }

    /// Derives the type from `st_mode` bits
    #[must_use]
    #[inline]
    pub const fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFREG => Self::RegularFile,
            S_IFDIR => Self::Directory,
            S_IFBLK => Self::BlockDevice,
            S_IFCHR => Self::CharDevice,
            S_IFIFO => Self::Fifo,
            S_IFLNK => Self::Symlink,
            S_IFSOCK => Self::Socket,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    #[inline]
    pub const fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }

    #[must_use]
    #[inline]
    pub const fn is_regular_file(self) -> bool {
        matches!(self, Self::RegularFile)
    }

    #[must_use]
    #[inline]
    pub const fn is_symlink(self) -> bool {
        matches!(self, Self::Symlink)
    }

    #[must_use]
    #[inline]
    pub const fn is_block_device(self) -> bool {
        matches!(self, Self::BlockDevice)
    }

    #[must_use]
    #[inline]
    pub const fn is_char_device(self) -> bool {
        matches!(self, Self::CharDevice)
    }

    #[must_use]
    #[inline]
    pub const fn is_pipe(self) -> bool {
        matches!(self, Self::Fifo)
    }

    #[must_use]
    #[inline]
    pub const fn is_socket(self) -> bool {
        matches!(self, Self::Socket)
    }

    /// True when the type still has to be resolved with a stat call
    #[must_use]
    #[inline]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockDevice => write!(f, "Block device"),
            Self::CharDevice => write!(f, "Character device"),
            Self::Directory => write!(f, "Directory"),
            Self::Fifo => write!(f, "FIFO"),
            Self::Symlink => write!(f, "Symlink"),
            Self::RegularFile => write!(f, "Regular file"),
            Self::Socket => write!(f, "Socket"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}
