//! Custom style detection from styles.xml.

use crate::error::Result;
use crate::safe_xml::{with_safe_xml_parsing, ParserConfig};

/// Collect the ids of user-defined styles.
///
/// A `w:style` element counts when it carries `w:customStyle` with a true
/// value and a non-empty `w:styleId`. Ids are returned in document order
/// without deduplication. Attribute prefixes are ignored.
pub fn filter_custom_styles(xml: &str, config: &ParserConfig) -> Result<Vec<String>> {
    let mut detected = Vec::new();

    with_safe_xml_parsing(xml, config, "style", |el| {
        let mut custom = false;
        let mut style_id = None;
        for attr in el.attributes {
            match attr.local_name.as_str() {
                "customStyle" if is_on(&attr.value) => custom = true,
                "styleId" if !attr.value.is_empty() => style_id = Some(attr.value),
                _ => {}
            }
        }
        if let (true, Some(id)) = (custom, style_id) {
            detected.push(id);
        }
    })?;

    Ok(detected)
}

/// OOXML on/off value.
fn is_on(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("on")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{}</w:styles>"#,
            body
        )
    }

    #[test]
    fn test_only_custom_styles_with_id() {
        let xml = styles(
            r#"<w:style w:type="paragraph" w:customStyle="1" w:styleId="MyStyle">
    <w:name w:val="My Style"/>
</w:style>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
</w:style>"#,
        );
        let detected = filter_custom_styles(&xml, &ParserConfig::safe()).unwrap();
        assert_eq!(detected, vec!["MyStyle"]);
    }

    #[test]
    fn test_requires_both_signals() {
        let xml = styles(
            r#"<w:style w:customStyle="1"/>
<w:style w:customStyle="1" w:styleId=""/>
<w:style w:customStyle="0" w:styleId="Off"/>
<w:style w:styleId="Plain"/>
<w:style w:styleId="Truthy" w:customStyle="true"/>"#,
        );
        let detected = filter_custom_styles(&xml, &ParserConfig::safe()).unwrap();
        assert_eq!(detected, vec!["Truthy"]);
    }

    #[test]
    fn test_duplicates_kept_in_order() {
        let xml = styles(
            r#"<w:style w:customStyle="1" w:styleId="B"/>
<w:style w:customStyle="1" w:styleId="A"/>
<w:style w:customStyle="1" w:styleId="B"/>"#,
        );
        let detected = filter_custom_styles(&xml, &ParserConfig::safe()).unwrap();
        assert_eq!(detected, vec!["B", "A", "B"]);
    }

    #[test]
    fn test_empty_or_malformed_yields_nothing() {
        assert!(filter_custom_styles("", &ParserConfig::safe()).unwrap().is_empty());
        assert!(filter_custom_styles("<w:styles><w:sty", &ParserConfig::safe())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_is_on() {
        assert!(is_on("1"));
        assert!(is_on("true"));
        assert!(is_on("On"));
        assert!(!is_on("0"));
        assert!(!is_on("false"));
        assert!(!is_on(""));
    }
}
