//! Opaque protocol message extensions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SamlError, SamlResult};
use crate::xml::check_single_element;

/// One extension element, kept byte-for-byte.
///
/// The element must declare the namespaces it uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Extension(String);

impl Extension {
    /// Wraps an XML element.
    ///
    /// # Errors
    ///
    /// Returns an error unless `xml` is exactly one well-formed element.
    pub fn parse(xml: impl Into<String>) -> SamlResult<Self> {
        let xml = xml.into();
        check_single_element(&xml)?;
        Ok(Self(xml))
    }

    /// Returns the element text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Extension {
    type Error = SamlError;

    fn try_from(xml: String) -> SamlResult<Self> {
        Self::parse(xml)
    }
}

impl From<Extension> for String {
    fn from(ext: Extension) -> Self {
        ext.0
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders `<samlp:Extensions>`, or nothing for an empty list.
#[must_use]
pub fn render_extensions(extensions: &[Extension]) -> String {
    if extensions.is_empty() {
        return String::new();
    }
    let mut out = String::from("<samlp:Extensions>");
    for ext in extensions {
        out.push_str(ext.as_str());
    }
    out.push_str("</samlp:Extensions>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXT: &str = r#"<MyLogoutExtension xmlns="urn:some:namespace"/>"#;

    #[test]
    fn keeps_bytes() {
        let ext = Extension::parse(EXT).unwrap();
        assert_eq!(ext.as_str(), EXT);
        assert_eq!(
            render_extensions(&[ext]),
            format!("<samlp:Extensions>{EXT}</samlp:Extensions>")
        );
    }

    #[test]
    fn empty_list_renders_nothing() {
        assert_eq!(render_extensions(&[]), "");
    }

    #[test]
    fn rejects_non_element() {
        assert!(Extension::parse("just text").is_err());
    }
}
