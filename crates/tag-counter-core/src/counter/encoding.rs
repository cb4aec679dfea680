use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use super::xml::ParseError;

/// How far into the file the `<?xml ... ?>` declaration is searched for.
const DECLARATION_WINDOW: usize = 1024;

/// Decode raw file bytes to a string following XML 1.0 autodetection:
/// byte order mark first, then BOM-less UTF-16 sniffing, then the
/// `encoding` pseudo-attribute of the declaration, and UTF-8 otherwise.
pub fn decode_xml(bytes: &[u8]) -> Result<String, ParseError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (sniff_encoding(bytes)?, bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or(ParseError::Encoding {
            encoding: encoding.name(),
        })
}

fn sniff_encoding(bytes: &[u8]) -> Result<&'static Encoding, ParseError> {
    match bytes {
        [0x3c, 0x00, 0x3f, 0x00, ..] => return Ok(UTF_16LE),
        [0x00, 0x3c, 0x00, 0x3f, ..] => return Ok(UTF_16BE),
        _ => {}
    }

    let Some(label) = declared_encoding(bytes) else {
        return Ok(UTF_8);
    };
    match Encoding::for_label(label.as_bytes()) {
        // A UTF-16 label on an 8-bit stream is a mislabel; the bytes rule.
        Some(encoding) if encoding == UTF_16LE || encoding == UTF_16BE => Ok(UTF_8),
        Some(encoding) => Ok(encoding),
        None => Err(ParseError::UnsupportedEncoding(label)),
    }
}

fn declared_encoding(bytes: &[u8]) -> Option<String> {
    if !bytes.starts_with(b"<?xml") {
        return None;
    }
    let window = &bytes[..bytes.len().min(DECLARATION_WINDOW)];
    let end = window.windows(2).position(|pair| pair == b"?>")?;
    let declaration = std::str::from_utf8(&window[..end]).ok()?;

    let rest = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let close = value.find(quote)?;
    Some(value[..close].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str, bom: bool) -> Vec<u8> {
        let mut bytes = if bom { vec![0xff, 0xfe] } else { Vec::new() };
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    fn utf16be(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xfe, 0xff];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        bytes
    }

    #[test]
    fn test_plain_utf8_passes_through() {
        assert_eq!(decode_xml(b"<r>caf\xc3\xa9</r>").unwrap(), "<r>café</r>");
    }

    #[test]
    fn test_utf8_bom_is_dropped() {
        assert_eq!(decode_xml(b"\xef\xbb\xbf<r/>").unwrap(), "<r/>");
    }

    #[test]
    fn test_utf16_with_bom() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><r><RecordID/></r>";
        assert_eq!(decode_xml(&utf16le(xml, true)).unwrap(), xml);
        assert_eq!(decode_xml(&utf16be(xml)).unwrap(), xml);
    }

    #[test]
    fn test_utf16le_without_bom_is_sniffed() {
        let xml = "<?xml version=\"1.0\"?><r/>";
        assert_eq!(decode_xml(&utf16le(xml, false)).unwrap(), xml);
    }

    #[test]
    fn test_declared_latin1() {
        let bytes = b"<?xml version=\"1.0\" encoding='ISO-8859-1'?><r>caf\xe9</r>";
        let text = decode_xml(bytes).unwrap();
        assert!(text.ends_with("<r>café</r>"));
    }

    #[test]
    fn test_utf16_label_on_ascii_bytes_reads_as_utf8() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"UTF-16\"?><r/>";
        assert!(decode_xml(bytes).unwrap().ends_with("<r/>"));
    }

    #[test]
    fn test_invalid_utf8_is_an_encoding_error() {
        let err = decode_xml(&[0x3c, 0x61, 0xff, 0x3e]).unwrap_err();
        assert!(matches!(err, ParseError::Encoding { encoding: "UTF-8" }));
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let err = decode_xml(b"<?xml version=\"1.0\" encoding=\"x-made-up\"?><r/>").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedEncoding(label) if label == "x-made-up"));
    }
}
