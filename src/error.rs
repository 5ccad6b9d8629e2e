//! Error types for document translation.

use std::path::PathBuf;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, DocxError>;

/// Errors that can occur while loading tables or processing a document.
#[derive(Debug, thiserror::Error)]
pub enum DocxError {
    /// The archive has no main body part, so it is not a valid DOCX
    #[error("{0} not found - invalid DOCX file")]
    MissingMainPart(String),

    /// A part selected for rewriting is not valid UTF-8
    #[error("part {name} is not valid UTF-8")]
    InvalidPartEncoding {
        /// Part name inside the archive
        name: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that was being accessed
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The zip container could not be read or written
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error while streaming zip entries in memory
    #[error("archive I/O error: {0}")]
    ArchiveIo(#[from] std::io::Error),

    /// Translation table JSON is malformed
    #[error("invalid translation table {path}: {source}")]
    TableJson {
        /// Table file
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Translation table CSV is malformed
    #[error("invalid translation table {path}: {source}")]
    TableCsv {
        /// Table file
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Translation table content has the wrong shape
    #[error("invalid translation table {path}: {reason}")]
    TableFormat {
        /// Table file
        path: PathBuf,
        /// What was wrong
        reason: String,
    },

    /// Table file extension is not one we know how to load
    #[error("unsupported translation table format: {0} (expected .json, .csv or .txt)")]
    UnsupportedTableFormat(PathBuf),

    /// Worker pool for parallel part rewriting could not be created
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Target tag name is not a usable element name
    #[error("invalid target tag {0:?}")]
    InvalidTag(String),

    /// Run pattern could not be compiled
    #[error("invalid run pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl DocxError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocxError::Io {
            path: path.into(),
            source,
        }
    }
}
