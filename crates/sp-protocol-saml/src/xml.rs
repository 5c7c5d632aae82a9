//! XML text helpers shared by message and metadata rendering.

use std::borrow::Cow;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{SamlError, SamlResult};

/// Escapes text for use in element content or a double-quoted attribute.
#[must_use]
pub fn escape(value: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(value)
}

/// Checks that `xml` is exactly one well-formed element.
///
/// Leading and trailing whitespace and comments are allowed.
///
/// # Errors
///
/// Returns [`SamlError::XmlParse`] otherwise.
pub fn check_single_element(xml: &str) -> SamlResult<()> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(_) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Empty(_) => {
                if depth == 0 {
                    roots += 1;
                }
            }
            Event::Text(text) if depth == 0 => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(SamlError::XmlParse(
                        "text outside of the root element".to_string(),
                    ));
                }
            }
            Event::CData(_) if depth == 0 => {
                return Err(SamlError::XmlParse(
                    "CDATA outside of the root element".to_string(),
                ));
            }
            Event::Decl(_) | Event::DocType(_) => {
                return Err(SamlError::XmlParse(
                    "declarations are not allowed in a fragment".to_string(),
                ));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(SamlError::XmlParse("unclosed element".to_string()));
    }
    match roots {
        1 => Ok(()),
        0 => Err(SamlError::XmlParse("no element".to_string())),
        n => Err(SamlError::XmlParse(format!("{n} root elements, expected one"))),
    }
}
