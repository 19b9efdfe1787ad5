// ABOUTME: Transcodes raw feed bytes to UTF-8 before XML parsing.
// ABOUTME: Honors a byte order mark or the XML declaration's encoding, else decodes lossily as UTF-8.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::debug;

/// Decodes document bytes into UTF-8 text.
///
/// A byte order mark wins over the declaration. Labels that are not ASCII
/// compatible (UTF-16 without a BOM) cannot be right for a declaration we just
/// read as ASCII, so they fall back to UTF-8.
pub(crate) fn decode_document(data: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(data) {
        let (text, _) = encoding.decode_without_bom_handling(&data[bom_len..]);
        return text;
    }

    match declared_encoding(data) {
        Some(encoding) if encoding != UTF_8 && encoding.is_ascii_compatible() => {
            let (text, had_errors) = encoding.decode_without_bom_handling(data);
            if had_errors {
                debug!(encoding = encoding.name(), "replaced undecodable bytes");
            }
            text
        }
        _ => String::from_utf8_lossy(data),
    }
}

/// Reads the `encoding` pseudo-attribute of a leading `<?xml ...?>` declaration.
fn declared_encoding(data: &[u8]) -> Option<&'static Encoding> {
    let mut reader = Reader::from_reader(data);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Decl(decl)) => {
                let label = decl.encoding()?.ok()?;
                return Encoding::for_label(label.as_ref());
            }
            Ok(Event::Text(ref text)) if text.iter().all(u8::is_ascii_whitespace) => {}
            _ => return None,
        }
        buf.clear();
    }
}
