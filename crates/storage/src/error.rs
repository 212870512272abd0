use core::fmt;

/// Reasons a TAR image or a file update is rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FsError {
    /// Header at `offset` does not carry the "ustar" magic.
    BadMagic { offset: usize },
    /// Stored checksum at `offset` does not match the header bytes.
    BadChecksum { offset: usize },
    /// Entry data would run past the end of the image.
    Truncated { offset: usize },
    /// File contents exceed the fixed per-file buffer.
    DataTooLarge(usize),
    /// File name exceeds the TAR name field.
    NameTooLong(usize),
    /// Every file slot is in use.
    TableFull,
    /// A file with this name is already stored.
    Exists,
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::BadMagic { offset } => write!(f, "invalid tar header at {:#x}: bad magic", offset),
            FsError::BadChecksum { offset } => {
                write!(f, "invalid tar header at {:#x}: checksum mismatch", offset)
            }
            FsError::Truncated { offset } => write!(f, "tar entry at {:#x} runs past the image", offset),
            FsError::DataTooLarge(len) => write!(f, "file too large: {} bytes", len),
            FsError::NameTooLong(len) => write!(f, "file name too long: {} bytes", len),
            FsError::TableFull => f.write_str("too many files"),
            FsError::Exists => f.write_str("file already exists"),
        }
    }
}

impl core::error::Error for FsError {}
