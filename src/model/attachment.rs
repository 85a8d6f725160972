//! Media and hyperlink attachment structures.

use crate::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// A media file found under the package's media directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// Media name with the media directory prefix stripped (e.g., "image1.png")
    pub name: String,

    /// Base64-encoded file content
    pub data: String,

    /// Id of the image relationship that references this file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_id: Option<String>,

    /// MIME type guessed from the extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Size of the raw (unencoded) content in bytes
    pub size: usize,
}

impl MediaAttachment {
    /// Create an attachment from raw bytes, base64-encoding them.
    pub fn new(name: impl Into<String>, raw: &[u8]) -> Self {
        let name = name.into();
        let content_type = Self::mime_from_filename(&name);
        Self {
            data: STANDARD.encode(raw),
            content_type,
            size: raw.len(),
            link_id: None,
            name,
        }
    }

    /// Decode the stored base64 data back into bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(&self.data)?)
    }

    /// Attach the id of the relationship that references this file.
    ///
    /// A later image relationship for the same file replaces an earlier one.
    pub fn set_link_id(&mut self, id: impl Into<String>) {
        self.link_id = Some(id.into());
    }

    /// Get the file extension, if any.
    pub fn extension(&self) -> Option<&str> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }

    /// Determine MIME type from filename.
    pub fn mime_from_filename(filename: &str) -> Option<String> {
        let (_, ext) = filename.rsplit_once('.')?;
        let mime = match ext.to_lowercase().as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "tiff" | "tif" => "image/tiff",
            "svg" => "image/svg+xml",
            "wmf" => "image/x-wmf",
            "emf" => "image/x-emf",
            "wdp" => "image/vnd.ms-photo",
            "mp3" => "audio/mpeg",
            "wav" => "audio/wav",
            "mp4" => "video/mp4",
            _ => return None,
        };
        Some(mime.to_string())
    }
}

/// A hyperlink declared in the document relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAttachment {
    /// Relationship id (e.g., "rId5")
    pub id: String,
    /// Link target, usually an absolute URL
    pub target: String,
    /// Whether the relationship is marked `TargetMode="External"`
    #[serde(default)]
    pub external: bool,
}

impl LinkAttachment {
    /// Create a new link attachment.
    pub fn new(id: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            target: target.into(),
            external: false,
        }
    }
}
