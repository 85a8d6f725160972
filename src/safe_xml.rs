//! Hardened XML reading for untrusted package parts.
//!
//! Every XML parse in this crate goes through [`with_safe_xml_parsing`].
//! The parser never fetches or includes DTDs and never expands entities
//! beyond the five predefined XML entities and character references, so
//! external-entity (XXE) payloads stay inert. Configuration is an explicit
//! value handed to each call; there is no process-wide parser state to
//! save or restore, which keeps parsing reentrant.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Per-call XML parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Tolerate a `<!DOCTYPE>` declaration. Its content is skipped either way;
    /// with `false` a strict parse rejects the document.
    pub allow_dtd: bool,
    /// Malformed input yields whatever was read before the fault instead of an error.
    pub recover: bool,
}

impl ParserConfig {
    /// DTDs disallowed, malformed input degrades to a partial parse.
    pub const fn safe() -> Self {
        Self {
            allow_dtd: false,
            recover: true,
        }
    }

    /// DTDs disallowed, malformed input is an [`Error::XmlParse`].
    pub const fn strict() -> Self {
        Self {
            allow_dtd: false,
            recover: false,
        }
    }

    /// Set whether malformed input is recovered from.
    pub fn with_recover(mut self, recover: bool) -> Self {
        self.recover = recover;
        self
    }

    /// Set whether a DOCTYPE declaration is tolerated.
    pub fn with_allow_dtd(mut self, allow: bool) -> Self {
        self.allow_dtd = allow;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::safe()
    }
}

/// A single attribute, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Qualified name as written (e.g. `w:styleId`)
    pub name: String,
    /// Name without namespace prefix (e.g. `styleId`)
    pub local_name: String,
    /// Unescaped value
    pub value: String,
}

/// An element start tag with its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Local element name
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<XmlAttribute>,
}

impl XmlElement {
    /// Look up an attribute value by its local name.
    pub fn attr(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    fn from_start(e: &BytesStart<'_>, config: &ParserConfig) -> Result<Self> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
        let mut attrs = e.attributes();
        attrs.with_checks(!config.recover);

        let mut attributes = Vec::new();
        for attr in attrs {
            let attr = match attr {
                Ok(attr) => attr,
                Err(err) if config.recover => {
                    log::debug!("dropping malformed attribute on <{}>: {}", name, err);
                    continue;
                }
                Err(err) => return Err(Error::XmlParse(err.to_string())),
            };
            // Unknown entities are left as written rather than expanded.
            let value = match attr.unescape_value() {
                Ok(v) => v.to_string(),
                Err(_) => String::from_utf8_lossy(&attr.value).to_string(),
            };
            attributes.push(XmlAttribute {
                name: String::from_utf8_lossy(attr.key.as_ref()).to_string(),
                local_name: String::from_utf8_lossy(attr.key.local_name().as_ref()).to_string(),
                value,
            });
        }
        Ok(Self { name, attributes })
    }
}

/// Parse `xml` under `config`, calling `visit` for every element whose local
/// name equals `tag`.
///
/// Empty input is a no-op. With a recovering config the only possible
/// outcome is `Ok`: elements seen before a fault are still visited.
///
/// # Example
///
/// ```
/// use docx_extract::safe_xml::{with_safe_xml_parsing, ParserConfig};
///
/// let mut ids = Vec::new();
/// with_safe_xml_parsing(
///     r#"<r><item id="a"/><item id="b"/></r>"#,
///     &ParserConfig::safe(),
///     "item",
///     |el| ids.extend(el.attr("id").map(String::from)),
/// )?;
/// assert_eq!(ids, ["a", "b"]);
/// # Ok::<(), docx_extract::Error>(())
/// ```
pub fn with_safe_xml_parsing<F>(
    xml: &str,
    config: &ParserConfig,
    tag: &str,
    mut visit: F,
) -> Result<()>
where
    F: FnMut(XmlElement),
{
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    if xml.trim().is_empty() {
        return Ok(());
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    if config.recover {
        reader.config_mut().check_end_names = false;
        reader.config_mut().allow_unmatched_ends = true;
    }

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == tag.as_bytes() {
                    visit(XmlElement::from_start(&e, config)?);
                }
            }
            Ok(Event::DocType(_)) => {
                if !config.allow_dtd && !config.recover {
                    return Err(Error::XmlParse(
                        "DOCTYPE declarations are not allowed".to_string(),
                    ));
                }
                log::debug!("skipping DOCTYPE declaration");
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                if config.recover {
                    log::debug!(
                        "malformed XML at position {}: {}; keeping partial result",
                        reader.buffer_position(),
                        e
                    );
                    break;
                }
                return Err(Error::XmlParse(e.to_string()));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(xml: &str, config: &ParserConfig, tag: &str) -> Result<Vec<XmlElement>> {
        let mut out = Vec::new();
        with_safe_xml_parsing(xml, config, tag, |el| out.push(el))?;
        Ok(out)
    }

    #[test]
    fn test_visits_matching_elements_by_local_name() {
        let xml = r#"<w:styles xmlns:w="urn:w">
            <w:style w:styleId="A"><w:name w:val="a"/></w:style>
            <w:style w:styleId="B"/>
        </w:styles>"#;
        let els = collect(xml, &ParserConfig::safe(), "style").unwrap();
        assert_eq!(els.len(), 2);
        assert_eq!(els[0].attr("styleId"), Some("A"));
        assert_eq!(els[0].attributes[0].name, "w:styleId");
        assert_eq!(els[1].attr("styleId"), Some("B"));
    }

    #[test]
    fn test_empty_input_is_noop() {
        assert!(collect("", &ParserConfig::strict(), "x").unwrap().is_empty());
        assert!(collect("  \n", &ParserConfig::strict(), "x").unwrap().is_empty());
    }

    #[test]
    fn test_external_entity_not_expanded() {
        let xml = r#"<?xml version="1.0"?>
<!DOCTYPE r [<!ENTITY xxe SYSTEM "file:///etc/passwd">]>
<r><item v="&xxe;" w="&amp;"/></r>"#;
        let els = collect(xml, &ParserConfig::safe(), "item").unwrap();
        assert_eq!(els.len(), 1);
        assert_eq!(els[0].attr("v"), Some("&xxe;"));
        assert_eq!(els[0].attr("w"), Some("&"));
    }

    #[test]
    fn test_duplicate_attribute_rejected_only_when_strict() {
        let xml = r#"<r><item id="1" id="2"/></r>"#;
        let err = collect(xml, &ParserConfig::strict(), "item").unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));

        let els = collect(xml, &ParserConfig::safe(), "item").unwrap();
        assert_eq!(els.len(), 1);
        assert_eq!(els[0].attr("id"), Some("1"));
    }

    #[test]
    fn test_leading_bom_ignored() {
        let xml = "\u{feff}<?xml version=\"1.0\"?><r><item id=\"a\"/></r>";
        let els = collect(xml, &ParserConfig::strict(), "item").unwrap();
        assert_eq!(els.len(), 1);
    }

    #[test]
    fn test_strict_rejects_doctype() {
        let xml = r#"<!DOCTYPE r [<!ENTITY a "b">]><r/>"#;
        let err = collect(xml, &ParserConfig::strict(), "r").unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));

        let allowed = ParserConfig::strict().with_allow_dtd(true);
        assert_eq!(collect(xml, &allowed, "r").unwrap().len(), 1);
    }

    #[test]
    fn test_recover_keeps_partial_tree() {
        let xml = r#"<r><item id="1"/><item id="2"/><item id="3></r>"#;
        let els = collect(xml, &ParserConfig::safe(), "item").unwrap();
        let ids: Vec<_> = els.iter().filter_map(|e| e.attr("id")).collect();
        assert_eq!(ids, ["1", "2"]);

        assert!(collect(xml, &ParserConfig::strict(), "item").is_err());
    }

    #[test]
    fn test_garbage_input_recovers_to_empty() {
        let els = collect("not xml at all <<<", &ParserConfig::safe(), "item").unwrap();
        assert!(els.is_empty());
    }
}
