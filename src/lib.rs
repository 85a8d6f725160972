//! # docx-extract
//!
//! Safe extraction of raw parts, media, hyperlinks and custom styles from
//! Word (.docx) packages.
//!
//! The package is treated as untrusted input: entries that cannot be read
//! are skipped, XML is parsed without DTD or external entity resolution,
//! and malformed XML degrades to partial results. The only hard failure is
//! a source that cannot be opened as a ZIP archive.
//!
//! ## Quick Start
//!
//! ```no_run
//! let result = docx_extract::parse_file("document.docx")?;
//!
//! for (name, media) in result.media() {
//!     println!("{} ({} bytes) linked as {:?}", name, media.size, media.link_id);
//! }
//! for link in result.links().values() {
//!     println!("{} -> {}", link.id, link.target);
//! }
//! println!("Custom styles: {:?}", result.detected_styles());
//! # Ok::<(), docx_extract::Error>(())
//! ```
//!
//! ## Options
//!
//! ```no_run
//! use docx_extract::{DocxExtractor, ExtractOptions, ParserConfig};
//!
//! let options = ExtractOptions::new()
//!     .with_parser(ParserConfig::strict())
//!     .exclude_extension("wmf");
//!
//! let result = DocxExtractor::open("report.docx")?
//!     .with_options(options)
//!     .extract();
//! # Ok::<(), docx_extract::Error>(())
//! ```

pub mod container;
pub mod docx;
pub mod error;
pub mod model;
pub mod options;
pub mod safe_xml;

// Re-exports
pub use container::OoxmlContainer;
pub use docx::DocxExtractor;
pub use error::{Error, Result};
pub use model::{ExtractionResult, LinkAttachment, MediaAttachment};
pub use options::{AttachmentFactory, ExtractOptions};
pub use safe_xml::ParserConfig;

use std::path::Path;

/// Extract a DOCX file with default options.
///
/// # Example
///
/// ```no_run
/// use docx_extract::parse_file;
///
/// let result = parse_file("document.docx")?;
/// println!("Media: {}", result.media().len());
/// # Ok::<(), docx_extract::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<ExtractionResult> {
    Ok(DocxExtractor::open(path)?.extract())
}

/// Extract a DOCX package held in memory with default options.
///
/// # Example
///
/// ```no_run
/// use docx_extract::parse_bytes;
///
/// let data = std::fs::read("document.docx")?;
/// let result = parse_bytes(&data)?;
/// # Ok::<(), docx_extract::Error>(())
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<ExtractionResult> {
    Ok(DocxExtractor::from_bytes(data.to_vec())?.extract())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bytes_rejects_garbage() {
        let err = parse_bytes(b"PK\x03\x04 but not really").unwrap_err();
        assert!(matches!(err, Error::ArchiveOpen(_)));
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file("test-files/does-not-exist.docx").unwrap_err();
        assert!(matches!(err, Error::ArchiveOpen(_)));
    }
}
