//! SAML Logout types.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{render_extensions, Extension, NameId, SAMLP_NS, SAML_NS};
use crate::xml::escape;

/// SAML Logout Request.
///
/// A request to terminate an existing session at the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// Unique identifier for this request.
    pub id: String,

    /// Timestamp when this request was issued.
    pub issue_instant: DateTime<Utc>,

    /// The entity ID of the requester.
    pub issuer: String,

    /// The IdP endpoint this request is addressed to.
    pub destination: String,

    /// The name identifier of the principal to log out.
    pub name_id: NameId,

    /// Session indexes to terminate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub session_indexes: Vec<String>,

    /// Reason for the logout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Time after which the request is no longer valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_on_or_after: Option<DateTime<Utc>>,

    /// Extension elements, in order.
    #[serde(default)]
    pub extensions: Vec<Extension>,
}

impl LogoutRequest {
    /// User logout reason.
    pub const REASON_USER: &'static str = "urn:oasis:names:tc:SAML:2.0:logout:user";

    /// Admin logout reason.
    pub const REASON_ADMIN: &'static str = "urn:oasis:names:tc:SAML:2.0:logout:admin";

    /// Creates a new logout request.
    #[must_use]
    pub fn new(issuer: impl Into<String>, destination: impl Into<String>, name_id: NameId) -> Self {
        Self {
            id: format!("_{}", uuid::Uuid::new_v4().simple()),
            issue_instant: Utc::now(),
            issuer: issuer.into(),
            destination: destination.into(),
            name_id,
            session_indexes: Vec::new(),
            reason: None,
            not_on_or_after: None,
            extensions: Vec::new(),
        }
    }

    /// Adds a session index to terminate.
    #[must_use]
    pub fn with_session_index(mut self, index: impl Into<String>) -> Self {
        self.session_indexes.push(index.into());
        self
    }

    /// Sets the logout reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Sets the validity period.
    #[must_use]
    pub fn valid_for(mut self, minutes: i64) -> Self {
        self.not_on_or_after = Some(self.issue_instant + chrono::Duration::minutes(minutes));
        self
    }

    /// Appends extension elements.
    #[must_use]
    pub fn with_extensions(mut self, extensions: impl IntoIterator<Item = Extension>) -> Self {
        self.extensions.extend(extensions);
        self
    }

    /// Serializes the request to XML.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut attrs = format!(
            r#" ID="{}" Version="2.0" IssueInstant="{}" Destination="{}""#,
            escape(&self.id),
            self.issue_instant.to_rfc3339_opts(SecondsFormat::Secs, true),
            escape(&self.destination),
        );
        if let Some(reason) = &self.reason {
            attrs.push_str(&format!(r#" Reason="{}""#, escape(reason)));
        }
        if let Some(not_after) = &self.not_on_or_after {
            attrs.push_str(&format!(
                r#" NotOnOrAfter="{}""#,
                not_after.to_rfc3339_opts(SecondsFormat::Secs, true)
            ));
        }

        let mut body = format!("<saml:Issuer>{}</saml:Issuer>", escape(&self.issuer));
        body.push_str(&render_extensions(&self.extensions));
        body.push_str(&self.name_id.to_xml());
        for index in &self.session_indexes {
            body.push_str(&format!("<samlp:SessionIndex>{}</samlp:SessionIndex>", escape(index)));
        }

        format!(
            r#"<samlp:LogoutRequest xmlns:samlp="{SAMLP_NS}" xmlns:saml="{SAML_NS}"{attrs}>{body}</samlp:LogoutRequest>"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NameIdFormat;

    #[test]
    fn logout_request_xml() {
        let name_id = NameId::new("value1").with_format(NameIdFormat::Unspecified.uri());
        let ext = Extension::parse(r#"<MyLogoutExtension xmlns="urn:some:namespace"/>"#).unwrap();
        let request = LogoutRequest::new("https://sp.example.org", "https://idp.example.org/slo", name_id)
            .with_session_index("_abc")
            .with_reason(LogoutRequest::REASON_USER)
            .with_extensions([ext]);

        let xml = request.to_xml();
        let issuer = xml.find("<saml:Issuer>").unwrap();
        let extensions = xml.find("<samlp:Extensions><MyLogoutExtension").unwrap();
        let name_id = xml.find("<saml:NameID").unwrap();
        let session = xml.find("<samlp:SessionIndex>_abc</samlp:SessionIndex>").unwrap();

        assert!(issuer < extensions && extensions < name_id && name_id < session);
        assert!(xml.contains(">value1</saml:NameID>"));
        assert!(xml.contains("Reason=\"urn:oasis:names:tc:SAML:2.0:logout:user\""));
    }

    #[test]
    fn validity_window_is_relative_to_issue_instant() {
        let request = LogoutRequest::new("sp", "https://idp/slo", NameId::new("x")).valid_for(5);
        let not_after = request.not_on_or_after.unwrap();
        assert_eq!(not_after - request.issue_instant, chrono::Duration::minutes(5));
        assert!(request.to_xml().contains("NotOnOrAfter="));
    }
}
