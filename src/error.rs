use std::path::PathBuf;

use thiserror::Error;

/// Failure raised by a format parser while reading an input that exists.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("XML parse error at position {position}: {source}")]
    Xml {
        source: quick_xml::Error,
        position: usize,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Why `CoverageLoader` could not produce a list of coverage files.
#[derive(Error, Debug)]
pub enum LoadCoverageFilesError {
    #[error("Coverage mode not supported: '{0}'")]
    ModeNotSupported(String),

    #[error("Input file not found: {}", .0.display())]
    InputFileNotFound(PathBuf),

    #[error("Coverage document listed but could not be loaded: {}", .0.display())]
    UnknownFilesMissingError(PathBuf),

    #[error("Malformed coverage input {}: {source}", path.display())]
    MalformedInput { path: PathBuf, source: ParseError },
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;
