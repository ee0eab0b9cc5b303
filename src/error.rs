//! Error types for docmark.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docmark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while cleaning a document.
#[derive(Error, Debug)]
pub enum Error {
    /// The input path does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The document is malformed or cannot be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error other than a missing file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No cleaner is registered for the file extension.
    #[error("Unsupported file extension: {0}")]
    UnsupportedFormat(String),

    /// A configuration file could not be decoded.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification of [`Error`], for mapping to exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Parse,
    Io,
    Unsupported,
    Config,
}

impl Error {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Io(e) if e.kind() == io::ErrorKind::NotFound => ErrorKind::NotFound,
            Error::Parse(_) => ErrorKind::Parse,
            Error::Io(_) => ErrorKind::Io,
            Error::UnsupportedFormat(_) => ErrorKind::Unsupported,
            Error::InvalidConfig(_) => ErrorKind::Config,
        }
    }

    /// Whether the error means the input does not exist.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Parse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}
