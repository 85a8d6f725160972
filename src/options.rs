//! Extraction options configuration.

use crate::model::MediaAttachment;
use crate::safe_xml::ParserConfig;
use std::fmt;
use std::sync::Arc;

/// Builds a [`MediaAttachment`] from a media name and its raw bytes.
pub type AttachmentFactory = Arc<dyn Fn(&str, &[u8]) -> MediaAttachment + Send + Sync>;

/// Options controlling a single extraction.
#[derive(Clone)]
pub struct ExtractOptions {
    /// XML parser configuration used for the relationships and styles parts
    pub parser: ParserConfig,

    /// Media extensions that are never extracted (compared case-insensitively)
    pub excluded_extensions: Vec<String>,

    /// Strategy used to build media attachments
    pub attachment_factory: AttachmentFactory,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            parser: ParserConfig::safe(),
            excluded_extensions: vec!["emf".to_string()],
            attachment_factory: Arc::new(|name: &str, raw: &[u8]| {
                MediaAttachment::new(name, raw)
            }),
        }
    }
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("parser", &self.parser)
            .field("excluded_extensions", &self.excluded_extensions)
            .finish_non_exhaustive()
    }
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the XML parser configuration.
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Replace the list of excluded media extensions.
    pub fn with_excluded_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Add a media extension to exclude.
    pub fn exclude_extension(mut self, extension: impl Into<String>) -> Self {
        self.excluded_extensions.push(extension.into());
        self
    }

    /// Set the media attachment factory.
    pub fn with_attachment_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str, &[u8]) -> MediaAttachment + Send + Sync + 'static,
    {
        self.attachment_factory = Arc::new(factory);
        self
    }

    /// Whether a media name ends in an excluded extension.
    ///
    /// The match is a plain case-insensitive suffix test, so `"fooemf"` is
    /// excluded along with `"foo.emf"`.
    pub fn is_excluded(&self, media_name: &str) -> bool {
        let name = media_name.to_ascii_lowercase();
        self.excluded_extensions.iter().any(|excluded| {
            let ext = excluded.trim_start_matches('.');
            !ext.is_empty() && name.ends_with(&ext.to_ascii_lowercase())
        })
    }
}
