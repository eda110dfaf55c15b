use thiserror::Error;

/// Errors raised while navigating an archive.
#[derive(Debug, Error)]
pub enum Error {
    #[error("header {index} at offset {offset} has an invalid magic value")]
    BadMagic { index: usize, offset: u64 },

    #[error("header {index} at offset {offset} has an invalid version value")]
    BadVersion { index: usize, offset: u64 },

    #[error("header {index} at offset {offset} has checksum {stored} but {computed} was computed")]
    BadChecksum {
        index: usize,
        offset: u64,
        stored: u32,
        computed: u32,
    },

    #[error("no regular file at `{0}`")]
    NotAFile(String),

    #[error("offset {offset} is outside of `{path}` ({size} bytes)")]
    OffsetOutOfRange { path: String, offset: u64, size: u64 },

    #[error("archive is truncated, expected a data block at offset {offset}")]
    Truncated { offset: u64 },

    #[error("archive ends at offset {offset} without an end-of-archive block")]
    MissingTerminator { offset: u64 },

    #[error("invalid octal value {value:?} in field `{field}`")]
    InvalidOctal { field: &'static str, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Integer status code for the outcome.
    ///
    /// Validation failures map to `-1` (magic), `-2` (version) and `-3`
    /// (checksum); read failures map to `-1` (not a file) and `-2` (offset
    /// out of range). Anything else is `-4`.
    pub fn code(&self) -> i32 {
        match self {
            Self::BadMagic { .. } => -1,
            Self::BadVersion { .. } => -2,
            Self::BadChecksum { .. } => -3,
            Self::NotAFile(_) => -1,
            Self::OffsetOutOfRange { .. } => -2,
            _ => -4,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
