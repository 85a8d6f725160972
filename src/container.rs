//! ZIP container abstraction for OOXML packages.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// A single archive entry read into memory.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Package-relative path (e.g., "word/media/image1.png")
    pub name: String,
    /// Whether the entry is a directory marker
    pub is_dir: bool,
    /// Raw (decompressed) bytes
    pub data: Vec<u8>,
}

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// After UTF-16 XML has been decoded into a Rust `String` the declaration
/// still says `encoding="UTF-16"`, which would make quick-xml try to decode
/// the UTF-8 text a second time.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
///
/// UTF-8 content is kept as written, BOM included; invalid sequences become
/// U+FFFD instead of failing the whole part. UTF-16 is transcoded and its
/// declaration rewritten to match.
pub fn decode_xml_bytes(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return fix_xml_encoding_declaration(&decode_utf16(rest, u16::from_le_bytes));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return fix_xml_encoding_declaration(&decode_utf16(rest, u16::from_be_bytes));
    }

    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(bytes).into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            // BOM-less UTF-16: ASCII markup leaves NUL in every other byte
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16(bytes, u16::from_le_bytes)
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16(bytes, u16::from_be_bytes)
            } else {
                String::from_utf8_lossy(bytes).into_owned()
            }
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// OOXML container abstraction over a ZIP archive.
///
/// The whole package is held in memory; the source file handle is closed
/// before [`OoxmlContainer::open`] returns, and the archive itself is
/// released when the container is dropped.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Open an OOXML container from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docx_extract::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("document.docx")?;
    /// # Ok::<(), docx_extract::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::ArchiveOpen(format!("{}: {}", path.display(), e)))?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| Error::ArchiveOpen(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(data)
    }

    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cursor = Cursor::new(data);
        let archive = zip::ZipArchive::new(cursor)?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Create an OOXML container from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| Error::ArchiveOpen(e.to_string()))?;
        Self::from_bytes(data)
    }

    /// Number of entries in the archive.
    pub fn len(&self) -> usize {
        self.archive.borrow().len()
    }

    /// Whether the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the entry at `index`, without decompressing it.
    pub fn entry_name(&self, index: usize) -> Option<String> {
        self.archive.borrow().name_for_index(index).map(String::from)
    }

    /// Read the entry at `index`.
    ///
    /// Failures are reported as [`Error::EntryRead`] so callers can skip the
    /// entry and carry on with the rest of the archive.
    pub fn read_entry(&self, index: usize) -> Result<Entry> {
        let fallback_name = self
            .entry_name(index)
            .unwrap_or_else(|| format!("#{}", index));
        let mut archive = self.archive.borrow_mut();

        let mut file = archive.by_index(index).map_err(|e| Error::EntryRead {
            name: fallback_name.clone(),
            reason: e.to_string(),
        })?;

        let name = file.name().to_string();
        let is_dir = file.is_dir();
        // Declared sizes are attacker-controlled.
        let mut data = Vec::new();
        file.read_to_end(&mut data).map_err(|e| Error::EntryRead {
            name: name.clone(),
            reason: e.to_string(),
        })?;

        Ok(Entry { name, is_dir, data })
    }

    /// Resolve a relative path from a base path.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_path = Path::new(base);
        let base_dir = base_path.parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            OoxmlContainer::resolve_path("word/document.xml", "media/image1.png"),
            "word/media/image1.png"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("word/document.xml", "../word/media/image1.png"),
            "word/media/image1.png"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("word/document.xml", "/word/media/image1.png"),
            "word/media/image1.png"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("word/document.xml", "../media/image1.png"),
            "media/image1.png"
        );
    }

    #[test]
    fn test_read_entries_in_order() {
        let data = build_zip(&[("word/document.xml", b"<w:document/>"), ("a.txt", b"A")]);
        let container = OoxmlContainer::from_bytes(data).unwrap();

        assert_eq!(container.len(), 2);
        assert_eq!(container.entry_name(1).as_deref(), Some("a.txt"));
        assert_eq!(container.entry_name(2), None);

        let first = container.read_entry(0).unwrap();
        assert_eq!(first.name, "word/document.xml");
        assert_eq!(first.data, b"<w:document/>");
        assert!(!first.is_dir);

        let err = container.read_entry(5).unwrap_err();
        assert!(matches!(err, Error::EntryRead { .. }));
    }

    #[test]
    fn test_open_rejects_non_zip() {
        let err = OoxmlContainer::from_bytes(b"definitely not a zip".to_vec()).unwrap_err();
        assert!(matches!(err, Error::ArchiveOpen(_)));

        let err = OoxmlContainer::open("does/not/exist.docx").unwrap_err();
        assert!(matches!(err, Error::ArchiveOpen(_)));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "source went away"))
        }
    }

    #[test]
    fn test_failing_reader_is_archive_open_error() {
        let err = OoxmlContainer::from_reader(FailingReader).unwrap_err();
        assert!(matches!(err, Error::ArchiveOpen(_)));
    }

    #[test]
    fn test_utf16_decoding_function() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be), "<?xml>");

        // UTF-8 is kept verbatim, BOM included
        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes(utf8_bom), "\u{feff}<?xml>");

        let utf8_plain = b"<?xml>";
        assert_eq!(decode_xml_bytes(utf8_plain), "<?xml>");
    }

    #[test]
    fn test_invalid_utf8_decoded_lossily() {
        let with_bom = b"\xEF\xBB\xBF<r a=\"\xFF\"/>";
        assert_eq!(decode_xml_bytes(with_bom), "\u{feff}<r a=\"\u{fffd}\"/>");

        let without_bom = b"<r a=\"\xFF\"/>";
        assert_eq!(decode_xml_bytes(without_bom), "<r a=\"\u{fffd}\"/>");

        let lone_surrogate = b"\xFF\xFE<\0\x00\xD8>\0";
        assert_eq!(decode_xml_bytes(lone_surrogate), "<\u{fffd}>");
    }

    #[test]
    fn test_utf16_declaration_rewritten() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in r#"<?xml version="1.0" encoding="UTF-16"?><r/>"#.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let result = decode_xml_bytes(&bytes);
        assert_eq!(result, r#"<?xml version="1.0" encoding="UTF-8"?><r/>"#);
    }
}
