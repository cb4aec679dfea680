use roxmltree::{Document, Node, ParsingOptions};
use std::fs;

use super::encoding::decode_xml;
use std::path::Path;
use thiserror::Error;

/// Why a single file could not be counted. Never fatal to a run.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid {encoding} byte sequence")]
    Encoding { encoding: &'static str },

    #[error("unsupported encoding '{0}'")]
    UnsupportedEncoding(String),

    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// One element as seen by debug output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    pub local_name: String,
    pub qualified_name: String,
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub root: ElementInfo,
    /// First elements in document order, root included.
    pub elements: Vec<ElementInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAnalysis {
    pub count: u64,
    pub summary: Option<DocumentSummary>,
}

/// Count elements whose local name equals `tag_name`, ignoring namespaces.
pub fn count_tag(contents: &str, tag_name: &str) -> Result<u64, ParseError> {
    let document = parse_document(contents)?;
    Ok(count_in_document(&document, tag_name))
}

/// Read, decode, parse and count one file. With `sample_limit`, also summarize the
/// document's first elements.
pub fn analyze_file(
    path: &Path,
    tag_name: &str,
    sample_limit: Option<usize>,
) -> Result<FileAnalysis, ParseError> {
    let contents = decode_xml(&fs::read(path)?)?;
    let document = parse_document(&contents)?;

    Ok(FileAnalysis {
        count: count_in_document(&document, tag_name),
        summary: sample_limit.map(|limit| summarize(&document, limit)),
    })
}

pub fn parse_document(contents: &str) -> Result<Document<'_>, ParseError> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    Ok(Document::parse_with_options(contents, options)?)
}

pub fn count_in_document(document: &Document, tag_name: &str) -> u64 {
    document
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == tag_name)
        .count() as u64
}

pub fn summarize(document: &Document, limit: usize) -> DocumentSummary {
    DocumentSummary {
        root: element_info(document.root_element()),
        elements: document
            .descendants()
            .filter(|node| node.is_element())
            .take(limit)
            .map(element_info)
            .collect(),
    }
}

fn element_info(node: Node) -> ElementInfo {
    let tag = node.tag_name();
    let local_name = tag.name().to_string();
    let namespace = tag.namespace().map(str::to_string);

    let qualified_name = match tag.namespace().and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, local_name),
        _ => local_name.clone(),
    };

    ElementInfo {
        local_name,
        qualified_name,
        namespace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_plain_elements_including_root() {
        let xml = "<RecordID><RecordID/><x><RecordID>1</RecordID></x></RecordID>";
        assert_eq!(count_tag(xml, "RecordID").unwrap(), 3);
    }

    #[test]
    fn test_prefix_is_stripped() {
        let xml = r#"<root xmlns:ns="urn:a" xmlns:other="urn:b">
            <ns:RecordID/>
            <other:RecordID/>
            <RecordID/>
        </root>"#;
        assert_eq!(count_tag(xml, "RecordID").unwrap(), 3);
    }

    #[test]
    fn test_default_namespace_counts_like_no_namespace() {
        let with_default = r#"<root xmlns="urn:records"><RecordID/><RecordID/></root>"#;
        let without = "<root><RecordID/><RecordID/></root>";
        assert_eq!(count_tag(with_default, "RecordID").unwrap(), 2);
        assert_eq!(count_tag(without, "RecordID").unwrap(), 2);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let xml = "<root><RecordId/><RecordId/></root>";
        assert_eq!(count_tag(xml, "RecordID").unwrap(), 0);
        assert_eq!(count_tag(xml, "RecordId").unwrap(), 2);
    }

    #[test]
    fn test_attributes_text_comments_and_pis_are_not_counted() {
        let xml = r#"<?RecordID data?>
            <root RecordID="1">
                <!-- <RecordID/> -->
                <?RecordID inside?>
                <note>RecordID</note>
                <![CDATA[<RecordID/>]]>
            </root>"#;
        assert_eq!(count_tag(xml, "RecordID").unwrap(), 0);
    }

    #[test]
    fn test_well_formed_without_matches_is_zero() {
        assert_eq!(count_tag("<root/>", "RecordID").unwrap(), 0);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let err = count_tag("<root><RecordID></root>", "RecordID").unwrap_err();
        assert!(matches!(err, ParseError::Xml(_)));
        assert!(err.to_string().starts_with("malformed XML"));
    }

    #[test]
    fn test_undefined_entity_is_an_error() {
        assert!(count_tag("<root>&bogus;</root>", "root").is_err());
    }

    #[test]
    fn test_doctype_and_bom_are_accepted() {
        let xml = "\u{feff}<?xml version=\"1.0\"?>\n<!DOCTYPE root>\n<root><a/></root>";
        assert_eq!(count_tag(xml, "a").unwrap(), 1);
    }

    #[test]
    fn test_summarize_reports_prefixes_and_namespaces() {
        let xml = r#"<Batch xmlns="urn:default" xmlns:r="urn:rec">
            <r:RecordID/>
            <Item/>
        </Batch>"#;
        let document = parse_document(xml).unwrap();
        let summary = summarize(&document, 3);

        assert_eq!(summary.root.local_name, "Batch");
        assert_eq!(summary.root.namespace.as_deref(), Some("urn:default"));
        assert_eq!(summary.elements.len(), 3);
        assert_eq!(summary.elements[0], summary.root);
        assert_eq!(summary.elements[1].qualified_name, "r:RecordID");
        assert_eq!(summary.elements[1].namespace.as_deref(), Some("urn:rec"));
        assert_eq!(summary.elements[2].qualified_name, "Item");
    }

    #[test]
    fn test_analyze_file_rejects_invalid_utf8() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.xml");
        fs::write(&path, [0x3c, 0x61, 0xff, 0x3e]).unwrap();
        let err = analyze_file(&path, "a", None).unwrap_err();
        assert!(matches!(err, ParseError::Encoding { .. }));
        assert_eq!(err.to_string(), "invalid UTF-8 byte sequence");
    }

    #[test]
    fn test_analyze_file_utf16le_with_bom() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("u16.xml");
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><r><RecordID/><x:RecordID xmlns:x=\"urn:x\"/></r>";
        let mut bytes = vec![0xff, 0xfe];
        for unit in xml.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        fs::write(&path, bytes).unwrap();

        let analysis = analyze_file(&path, "RecordID", None).unwrap();
        assert_eq!(analysis.count, 2);
    }

    #[test]
    fn test_analyze_file_declared_latin1() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("latin1.xml");
        fs::write(
            &path,
            b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><r><RecordID>caf\xe9</RecordID></r>",
        )
        .unwrap();

        let analysis = analyze_file(&path, "RecordID", Some(5)).unwrap();
        assert_eq!(analysis.count, 1);
        assert_eq!(analysis.summary.unwrap().root.local_name, "r");
    }

    #[test]
    fn test_analyze_file_with_sample() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ok.xml");
        fs::write(&path, "<root><a/><a/><b/></root>").unwrap();
        let analysis = analyze_file(&path, "a", Some(2)).unwrap();
        assert_eq!(analysis.count, 2);
        assert_eq!(analysis.summary.unwrap().elements.len(), 2);
    }
}
