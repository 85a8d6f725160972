//! The aggregate produced by one extraction pass.

use super::{LinkAttachment, MediaAttachment};
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything pulled out of a package by [`crate::DocxExtractor::extract`].
///
/// Built once per extraction and read-only afterwards. Maps are ordered so
/// that repeated extractions of the same package compare and serialize
/// identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub(crate) document_xml: String,
    pub(crate) styles_xml: String,
    pub(crate) relationships_xml: String,
    pub(crate) media: BTreeMap<String, MediaAttachment>,
    pub(crate) links: BTreeMap<String, LinkAttachment>,
    pub(crate) detected_styles: Vec<String>,
}

impl ExtractionResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw main document XML (empty if the part was absent).
    pub fn document_xml(&self) -> &str {
        &self.document_xml
    }

    /// Raw styles XML (empty if the part was absent).
    pub fn styles_xml(&self) -> &str {
        &self.styles_xml
    }

    /// Raw document relationships XML (empty if the part was absent).
    pub fn relationships_xml(&self) -> &str {
        &self.relationships_xml
    }

    /// Media attachments keyed by media name.
    pub fn media(&self) -> &BTreeMap<String, MediaAttachment> {
        &self.media
    }

    /// Get a media attachment by name.
    pub fn media_attachment(&self, name: &str) -> Option<&MediaAttachment> {
        self.media.get(name)
    }

    /// Find the media attachment referenced by an image relationship id.
    pub fn media_for_link(&self, link_id: &str) -> Option<&MediaAttachment> {
        self.media
            .values()
            .find(|m| m.link_id.as_deref() == Some(link_id))
    }

    /// Hyperlinks keyed by relationship id.
    pub fn links(&self) -> &BTreeMap<String, LinkAttachment> {
        &self.links
    }

    /// Get a hyperlink by relationship id.
    pub fn link(&self, id: &str) -> Option<&LinkAttachment> {
        self.links.get(id)
    }

    /// Ids of user-defined styles, in document order.
    pub fn detected_styles(&self) -> &[String] {
        &self.detected_styles
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.document_xml.is_empty()
            && self.styles_xml.is_empty()
            && self.relationships_xml.is_empty()
            && self.media.is_empty()
            && self.links.is_empty()
            && self.detected_styles.is_empty()
    }

    /// Serialize the result to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| Error::Encoding(e.to_string()))
    }
}
