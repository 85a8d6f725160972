//! Document relationship resolution.
//!
//! Turns `word/_rels/document.xml.rels` into hyperlink attachments and
//! tags media attachments with the id of the image relationship that
//! points at them.

use super::parts;
use crate::container::OoxmlContainer;
use crate::error::Result;
use crate::model::{LinkAttachment, MediaAttachment};
use crate::safe_xml::{with_safe_xml_parsing, ParserConfig};
use std::collections::BTreeMap;

/// Relationship type as far as extraction cares.
///
/// Classification is a case-insensitive substring test on the type URI.
/// Any future relationship type whose URI happens to contain one of the
/// markers is classified the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    Hyperlink,
    Image,
    Other,
}

impl RelationshipKind {
    const HYPERLINK_MARKER: &'static str = "relationships/hyperlink";
    const IMAGE_MARKER: &'static str = "relationships/image";

    /// Classify a relationship type URI.
    pub fn classify(rel_type: &str) -> Self {
        let lower = rel_type.to_ascii_lowercase();
        if lower.contains(Self::HYPERLINK_MARKER) {
            RelationshipKind::Hyperlink
        } else if lower.contains(Self::IMAGE_MARKER) {
            RelationshipKind::Image
        } else {
            RelationshipKind::Other
        }
    }
}

/// Map an image relationship target to a media attachment name.
///
/// The usual target is `media/<name>`; other spellings are resolved against
/// the main document part and must land inside the media directory.
pub fn media_name_from_target(target: &str) -> Option<String> {
    if let Some(name) = target.strip_prefix("media/") {
        return Some(name.to_string());
    }
    let resolved = OoxmlContainer::resolve_path(parts::DOCUMENT, target);
    resolved
        .strip_prefix(parts::MEDIA_DIR)
        .filter(|name| !name.is_empty())
        .map(String::from)
}

/// Resolve hyperlinks and image references from relationships XML.
///
/// Returns the hyperlinks keyed by relationship id (a repeated id keeps the
/// last one) and sets `link_id` on every media attachment an image
/// relationship points at. Relationship elements missing `Id`, `Type` or
/// `Target` are skipped. Image references with no matching attachment are
/// dropped. Media is left untouched if the parse fails.
pub fn resolve_relationships(
    xml: &str,
    media: &mut BTreeMap<String, MediaAttachment>,
    config: &ParserConfig,
) -> Result<BTreeMap<String, LinkAttachment>> {
    let mut links = BTreeMap::new();
    let mut image_links = Vec::new();

    with_safe_xml_parsing(xml, config, "Relationship", |el| {
        let (Some(id), Some(rel_type), Some(target)) =
            (el.attr("Id"), el.attr("Type"), el.attr("Target"))
        else {
            log::trace!("skipping incomplete relationship element");
            return;
        };

        match RelationshipKind::classify(rel_type) {
            RelationshipKind::Hyperlink => {
                let external = el
                    .attr("TargetMode")
                    .is_some_and(|mode| mode.eq_ignore_ascii_case("external"));
                links.insert(
                    id.to_string(),
                    LinkAttachment {
                        id: id.to_string(),
                        target: target.to_string(),
                        external,
                    },
                );
            }
            RelationshipKind::Image => match media_name_from_target(target) {
                Some(name) => image_links.push((name, id.to_string())),
                None => log::debug!("image relationship {} targets {} outside media", id, target),
            },
            RelationshipKind::Other => {}
        }
    })?;

    for (name, id) in image_links {
        match media.get_mut(&name) {
            Some(attachment) => attachment.set_link_id(id),
            None => log::debug!("image relationship {} has no media named {}", id, name),
        }
    }

    Ok(links)
}
