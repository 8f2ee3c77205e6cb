//! Error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::md5::ParseDigestError;

pub type Result<T> = std::result::Result<T, Error>;

/// md5crack errors
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error, with the file it happened on
    #[error("I/O error on '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File size is not a whole number of records
    #[error("Invalid file size for '{}': {size} bytes is not a multiple of the {record_size}-byte record", .path.display())]
    InvalidFileSize {
        path: PathBuf,
        size: u64,
        record_size: usize,
    },

    /// Malformed hex digest
    #[error(transparent)]
    Digest(#[from] ParseDigestError),

    /// No ASCII character matches the alphabet pattern
    #[error("Alphabet pattern generates an empty alphabet")]
    EmptyAlphabet,

    /// Alphabet pattern is not a valid regular expression
    #[error("Invalid alphabet pattern")]
    AlphabetPattern(#[from] regex::Error),

    /// Reduction index outside the password space
    #[error("Reduction index {index} is too large for {alphabet_size} characters of length {password_length}")]
    ReductionIndex {
        index: usize,
        alphabet_size: usize,
        password_length: usize,
    },

    /// Password length without a compiled table type
    #[error("Unsupported password length {0}")]
    PasswordLength(usize),

    /// More chains than distinct passwords
    #[error("Table of {length} chains cannot be duplicate-free over a space of {space} passwords")]
    TableTooLong { length: usize, space: u128 },

    /// Table byte size overflows
    #[error("Table of {length} chains of {record_size} bytes is too large")]
    TableSize { length: usize, record_size: usize },
}

impl Error {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
