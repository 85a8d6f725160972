//! Error types for the docx-extract library.

use std::io;
use thiserror::Error;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting a package.
///
/// Opening a package, from a path, bytes or a reader, can only fail with
/// [`Error::ArchiveOpen`]. Extraction itself never fails: the other variants
/// are logged and the affected part is skipped.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source could not be opened as a ZIP container.
    #[error("Cannot open archive: {0}")]
    ArchiveOpen(String),

    /// A single archive entry could not be read.
    #[error("Cannot read entry {name}: {reason}")]
    EntryRead { name: String, reason: String },

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Error during text encoding conversion.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Attachment data is not valid base64.
    #[error("Base64 decode error: {0}")]
    Base64(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ArchiveOpen(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Base64(err.to_string())
    }
}
