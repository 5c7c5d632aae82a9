//! SAML AuthnRequest types.
//!
//! Authentication request message sent by this service provider to an identity provider.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{render_extensions, Extension, NameId, NameIdPolicy, SAMLP_NS, SAML_NS};
use crate::scope::ScopeList;
use crate::xml::escape;

/// SAML Authentication Request.
///
/// An authentication request message sent from a service provider to an
/// identity provider requesting authentication of a principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthnRequest {
    /// Unique identifier for this request.
    pub id: String,

    /// Timestamp when this request was issued.
    pub issue_instant: DateTime<Utc>,

    /// The entity ID of the service provider issuing the request.
    pub issuer: String,

    /// The IdP endpoint this request is addressed to.
    pub destination: String,

    /// The URL where the response should be sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertion_consumer_service_url: Option<String>,

    /// Binding or profile to use for the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_binding: Option<String>,

    /// Name ID policy constraints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_id_policy: Option<NameIdPolicy>,

    /// The principal the IdP should authenticate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<NameId>,

    /// Requested authentication context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_authn_context: Option<RequestedAuthnContext>,

    /// Whether the IdP must authenticate the user directly.
    #[serde(default)]
    pub force_authn: bool,

    /// Whether the IdP must not interact with the user.
    #[serde(default)]
    pub is_passive: bool,

    /// IdPs the requester is willing to accept, sent as `<samlp:Scoping>`.
    #[serde(default)]
    pub scoping: ScopeList,

    /// Extension elements, in order.
    #[serde(default)]
    pub extensions: Vec<Extension>,
}

impl AuthnRequest {
    /// Creates a new authentication request with a fresh ID.
    #[must_use]
    pub fn new(issuer: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            id: format!("_{}", uuid::Uuid::new_v4().simple()),
            issue_instant: Utc::now(),
            issuer: issuer.into(),
            destination: destination.into(),
            assertion_consumer_service_url: None,
            protocol_binding: None,
            name_id_policy: None,
            subject: None,
            requested_authn_context: None,
            force_authn: false,
            is_passive: false,
            scoping: ScopeList::default(),
            extensions: Vec::new(),
        }
    }

    /// Sets the assertion consumer service URL.
    #[must_use]
    pub fn with_acs_url(mut self, url: impl Into<String>) -> Self {
        self.assertion_consumer_service_url = Some(url.into());
        self
    }

    /// Sets the protocol binding for the response.
    #[must_use]
    pub fn with_protocol_binding(mut self, binding: impl Into<String>) -> Self {
        self.protocol_binding = Some(binding.into());
        self
    }

    /// Sets the name ID policy.
    #[must_use]
    pub fn with_name_id_policy(mut self, policy: NameIdPolicy) -> Self {
        self.name_id_policy = Some(policy);
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn with_subject(mut self, name_id: NameId) -> Self {
        self.subject = Some(name_id);
        self
    }

    /// Sets the requested authentication context.
    #[must_use]
    pub fn with_authn_context(mut self, context: RequestedAuthnContext) -> Self {
        self.requested_authn_context = Some(context);
        self
    }

    /// Sets force authentication.
    #[must_use]
    pub const fn force_authn(mut self, force: bool) -> Self {
        self.force_authn = force;
        self
    }

    /// Sets passive authentication.
    #[must_use]
    pub const fn is_passive(mut self, passive: bool) -> Self {
        self.is_passive = passive;
        self
    }

    /// Sets the scoping list.
    #[must_use]
    pub fn with_scoping(mut self, scoping: ScopeList) -> Self {
        self.scoping = scoping;
        self
    }

    /// Appends extension elements.
    #[must_use]
    pub fn with_extensions(mut self, extensions: impl IntoIterator<Item = Extension>) -> Self {
        self.extensions.extend(extensions);
        self
    }

    /// Serializes the request to XML.
    ///
    /// Children appear in schema order, so a signature can be inserted
    /// directly after `<saml:Issuer>`.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut attrs = format!(
            r#" ID="{}" Version="2.0" IssueInstant="{}" Destination="{}""#,
            escape(&self.id),
            self.issue_instant.to_rfc3339_opts(SecondsFormat::Secs, true),
            escape(&self.destination),
        );
        if self.force_authn {
            attrs.push_str(r#" ForceAuthn="true""#);
        }
        if self.is_passive {
            attrs.push_str(r#" IsPassive="true""#);
        }
        if let Some(url) = &self.assertion_consumer_service_url {
            attrs.push_str(&format!(r#" AssertionConsumerServiceURL="{}""#, escape(url)));
        }
        if let Some(binding) = &self.protocol_binding {
            attrs.push_str(&format!(r#" ProtocolBinding="{}""#, escape(binding)));
        }

        let mut body = format!("<saml:Issuer>{}</saml:Issuer>", escape(&self.issuer));
        body.push_str(&render_extensions(&self.extensions));
        if let Some(subject) = &self.subject {
            body.push_str(&format!("<saml:Subject>{}</saml:Subject>", subject.to_xml()));
        }
        if let Some(policy) = &self.name_id_policy {
            body.push_str(&policy.to_xml());
        }
        if let Some(context) = &self.requested_authn_context {
            body.push_str(&context.to_xml());
        }
        body.push_str(&self.scoping.to_xml());

        format!(
            r#"<samlp:AuthnRequest xmlns:samlp="{SAMLP_NS}" xmlns:saml="{SAML_NS}"{attrs}>{body}</samlp:AuthnRequest>"#
        )
    }
}

/// Requested authentication context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedAuthnContext {
    /// Comparison method for the authentication context.
    #[serde(default)]
    pub comparison: AuthnContextComparison,

    /// List of acceptable authentication context class references.
    #[serde(default)]
    pub authn_context_class_refs: Vec<String>,
}

impl RequestedAuthnContext {
    /// Creates a context accepting any of the given class references exactly.
    #[must_use]
    pub fn exact(class_refs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            comparison: AuthnContextComparison::Exact,
            authn_context_class_refs: class_refs.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the comparison method.
    #[must_use]
    pub const fn with_comparison(mut self, comparison: AuthnContextComparison) -> Self {
        self.comparison = comparison;
        self
    }

    fn to_xml(&self) -> String {
        let refs: String = self
            .authn_context_class_refs
            .iter()
            .map(|r| format!("<saml:AuthnContextClassRef>{}</saml:AuthnContextClassRef>", escape(r)))
            .collect();
        format!(
            r#"<samlp:RequestedAuthnContext Comparison="{}">{refs}</samlp:RequestedAuthnContext>"#,
            self.comparison.as_str()
        )
    }
}

/// Authentication context comparison methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthnContextComparison {
    /// Exact match required.
    #[default]
    Exact,
    /// Match must be at least as strong.
    Minimum,
    /// Match must be at most as strong.
    Maximum,
    /// Match must be stronger than any listed context.
    Better,
}

impl AuthnContextComparison {
    /// Returns the string value for this comparison.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
            Self::Better => "better",
        }
    }
}
