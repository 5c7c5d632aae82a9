//! SAML Name ID types.

use serde::{Deserialize, Serialize};

use super::NameIdFormat;
use crate::xml::escape;

/// SAML Name ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameId {
    /// The actual identifier value.
    pub value: String,

    /// The format URI of the name identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// The security or administrative domain that qualifies the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_qualifier: Option<String>,

    /// The service provider's entity ID that qualifies the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sp_name_qualifier: Option<String>,
}

impl NameId {
    /// Creates a new name ID with the given value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            format: None,
            name_qualifier: None,
            sp_name_qualifier: None,
        }
    }

    /// Sets the format URI.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the name qualifier.
    #[must_use]
    pub fn with_name_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.name_qualifier = Some(qualifier.into());
        self
    }

    /// Sets the SP name qualifier.
    #[must_use]
    pub fn with_sp_name_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.sp_name_qualifier = Some(qualifier.into());
        self
    }

    /// Renders `<saml:NameID>`.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<saml:NameID");
        for (name, value) in [
            ("NameQualifier", &self.name_qualifier),
            ("SPNameQualifier", &self.sp_name_qualifier),
            ("Format", &self.format),
        ] {
            if let Some(v) = value {
                out.push_str(&format!(" {name}=\"{}\"", escape(v)));
            }
        }
        out.push_str(&format!(">{}</saml:NameID>", escape(&self.value)));
        out
    }
}

/// Name ID policy for authentication requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameIdPolicy {
    /// The requested name ID format.
    pub format: String,

    /// Whether the IdP may create a new identifier.
    pub allow_create: bool,
}

impl Default for NameIdPolicy {
    fn default() -> Self {
        Self {
            format: NameIdFormat::Transient.uri().to_string(),
            allow_create: true,
        }
    }
}

impl From<&sp_core::config::NameIdPolicyConfig> for NameIdPolicy {
    fn from(config: &sp_core::config::NameIdPolicyConfig) -> Self {
        Self {
            format: config
                .format
                .clone()
                .unwrap_or_else(|| NameIdFormat::Transient.uri().to_string()),
            allow_create: config.allow_create,
        }
    }
}

impl NameIdPolicy {
    /// Renders `<samlp:NameIDPolicy>`.
    #[must_use]
    pub fn to_xml(&self) -> String {
        format!(
            r#"<samlp:NameIDPolicy Format="{}" AllowCreate="{}"/>"#,
            escape(&self.format),
            self.allow_create
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_id_xml() {
        let name_id = NameId::new("user@example.org")
            .with_format(NameIdFormat::Unspecified.uri())
            .with_sp_name_qualifier("urn:sp");
        assert_eq!(
            name_id.to_xml(),
            "<saml:NameID SPNameQualifier=\"urn:sp\" \
             Format=\"urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified\">user@example.org</saml:NameID>"
        );
    }

    #[test]
    fn policy_defaults_to_transient() {
        let config = sp_core::config::NameIdPolicyConfig::default();
        let policy = NameIdPolicy::from(&config);
        assert_eq!(policy, NameIdPolicy::default());
        assert!(policy.to_xml().contains("nameid-format:transient"));
        assert!(policy.to_xml().contains("AllowCreate=\"true\""));
    }
}
