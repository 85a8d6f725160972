//! DOCX (Word) package extraction.
//!
//! This module provides extraction of raw parts, media, hyperlinks and
//! custom styles from Office Open XML word-processing packages (.docx).

mod extractor;
pub mod relationships;
pub mod styles;

pub use extractor::DocxExtractor;
pub use relationships::{resolve_relationships, RelationshipKind};
pub use styles::filter_custom_styles;

/// Fixed part locations inside a word-processing package.
pub mod parts {
    /// Main document part
    pub const DOCUMENT: &str = "word/document.xml";
    /// Style definitions part
    pub const STYLES: &str = "word/styles.xml";
    /// Relationships of the main document part
    pub const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";
    /// Directory holding embedded media, including the trailing slash
    pub const MEDIA_DIR: &str = "word/media/";
}

/// What a package entry is, judged by its path alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PartKind {
    Document,
    Styles,
    Relationships,
    /// Media file, carrying the name with [`parts::MEDIA_DIR`] stripped
    Media(String),
    Other,
}

impl PartKind {
    pub(crate) fn classify(entry_name: &str) -> Self {
        match entry_name {
            parts::DOCUMENT_RELS => PartKind::Relationships,
            parts::DOCUMENT => PartKind::Document,
            parts::STYLES => PartKind::Styles,
            _ => match entry_name.strip_prefix(parts::MEDIA_DIR) {
                Some(name) if !name.is_empty() && !name.ends_with('/') => {
                    PartKind::Media(name.to_string())
                }
                _ => PartKind::Other,
            },
        }
    }
}
