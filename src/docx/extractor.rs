//! DOCX extractor implementation.

use crate::container::{decode_xml_bytes, OoxmlContainer};
use crate::error::Result;
use crate::model::ExtractionResult;
use crate::options::ExtractOptions;
use std::io::Read;
use std::path::Path;

use super::relationships::resolve_relationships;
use super::styles::filter_custom_styles;
use super::PartKind;

/// Extractor for DOCX (Word) packages.
///
/// Opening is the only step that can fail. [`DocxExtractor::extract`]
/// consumes the extractor, so the archive is released before the
/// relationships and styles are resolved.
#[derive(Debug)]
pub struct DocxExtractor {
    container: OoxmlContainer,
    options: ExtractOptions,
}

impl DocxExtractor {
    /// Open a DOCX file for extraction.
    ///
    /// Fails with [`crate::Error::ArchiveOpen`] if the path cannot be read
    /// or is not a ZIP archive.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Ok(Self::from_container(container))
    }

    /// Create an extractor from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Ok(Self::from_container(container))
    }

    /// Create an extractor from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let container = OoxmlContainer::from_reader(reader)?;
        Ok(Self::from_container(container))
    }

    fn from_container(container: OoxmlContainer) -> Self {
        Self {
            container,
            options: ExtractOptions::default(),
        }
    }

    /// Replace the extraction options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Current extraction options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Get the underlying container.
    pub fn container(&self) -> &OoxmlContainer {
        &self.container
    }

    /// Run the extraction.
    ///
    /// Unreadable entries and malformed XML are logged and skipped; the
    /// result then holds whatever could be recovered.
    pub fn extract(self) -> ExtractionResult {
        let Self { container, options } = self;
        let mut result = ExtractionResult::new();

        for index in 0..container.len() {
            let Some(name) = container.entry_name(index) else {
                continue;
            };
            let kind = PartKind::classify(&name);
            match &kind {
                PartKind::Other => continue,
                PartKind::Media(media_name) if options.is_excluded(media_name) => {
                    log::debug!("skipping excluded media {}", name);
                    continue;
                }
                _ => {}
            }

            let entry = match container.read_entry(index) {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("{}", e);
                    continue;
                }
            };
            if entry.is_dir {
                continue;
            }
            log::trace!("{} -> {:?}", entry.name, kind);

            let slot = match kind {
                PartKind::Media(media_name) => {
                    let attachment = (options.attachment_factory)(&media_name, &entry.data);
                    result.media.insert(media_name, attachment);
                    continue;
                }
                PartKind::Document => &mut result.document_xml,
                PartKind::Styles => &mut result.styles_xml,
                PartKind::Relationships => &mut result.relationships_xml,
                PartKind::Other => continue,
            };
            *slot = decode_xml_bytes(&entry.data);
        }
        drop(container);

        match resolve_relationships(&result.relationships_xml, &mut result.media, &options.parser)
        {
            Ok(links) => result.links = links,
            Err(e) => log::warn!("relationships not resolved: {}", e),
        }

        match filter_custom_styles(&result.styles_xml, &options.parser) {
            Ok(styles) => result.detected_styles = styles,
            Err(e) => log::warn!("custom styles not detected: {}", e),
        }

        result
    }
}
