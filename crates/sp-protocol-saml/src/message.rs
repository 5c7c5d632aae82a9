//! Building signed authentication and logout requests.

use serde::Serialize;

use crate::bindings::HttpRedirectBinding;
use crate::error::SamlResult;
use crate::scope::ScopeList;
use crate::signature::MessageSigner;
use crate::state::RuntimeState;
use crate::types::{AuthnRequest, Extension, IdpMetadata, LogoutRequest, NameId, NameIdPolicy, RequestedAuthnContext};

/// Kind of outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// `<samlp:AuthnRequest>`.
    AuthnRequest,
    /// `<samlp:LogoutRequest>`.
    LogoutRequest,
}

/// A finished message, ready for a transport.
#[derive(Debug, Clone, Serialize)]
pub struct SignedMessage {
    /// Message kind.
    pub kind: MessageKind,
    /// Message ID.
    pub id: String,
    /// IdP endpoint the message is addressed to.
    pub destination: String,
    /// The XML with an enveloped signature, for bindings that carry it as is.
    pub xml: String,
    /// HTTP-Redirect URL with a detached query signature.
    pub redirect_url: String,
    /// Relay state sent along with the message.
    pub relay_state: Option<String>,
}

/// Service provider settings applied to every authentication request.
#[derive(Debug, Clone, Default)]
pub struct RequestSettings {
    /// Where responses should be delivered.
    pub acs_url: Option<String>,
    /// Binding or profile requested for the response.
    pub protocol_binding: Option<String>,
    /// Name ID policy.
    pub name_id_policy: Option<NameIdPolicy>,
}

/// Builds and signs messages on behalf of one service provider.
pub struct MessageBuilder<'a> {
    issuer: &'a str,
    signer: &'a dyn MessageSigner,
    settings: &'a RequestSettings,
}

impl<'a> MessageBuilder<'a> {
    /// Creates a builder for messages issued by `issuer`.
    #[must_use]
    pub fn new(issuer: &'a str, signer: &'a dyn MessageSigner, settings: &'a RequestSettings) -> Self {
        Self {
            issuer,
            signer,
            settings,
        }
    }

    /// Builds an authentication request to `idp`'s single sign-on endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the IdP has no redirect SSO endpoint or signing fails.
    pub fn authn_request(
        &self,
        idp: &IdpMetadata,
        state: &RuntimeState,
        scope: &ScopeList,
    ) -> SamlResult<SignedMessage> {
        let mut request = AuthnRequest::new(self.issuer, idp.sso_location()?)
            .force_authn(state.force_authn)
            .is_passive(state.is_passive)
            .with_scoping(scope.clone())
            .with_extensions(state.extensions.iter().cloned());
        if let Some(url) = &self.settings.acs_url {
            request = request.with_acs_url(url.clone());
        }
        if let Some(binding) = &self.settings.protocol_binding {
            request = request.with_protocol_binding(binding.clone());
        }
        if let Some(policy) = &self.settings.name_id_policy {
            request = request.with_name_id_policy(policy.clone());
        }
        if let Some(name_id) = &state.name_id {
            request = request.with_subject(name_id.clone());
        }
        if !state.authn_context_class_ref.is_empty() {
            request = request.with_authn_context(
                RequestedAuthnContext::exact(state.authn_context_class_ref.iter().cloned())
                    .with_comparison(state.authn_context_comparison),
            );
        }

        self.finish(
            MessageKind::AuthnRequest,
            request.id.clone(),
            request.destination.clone(),
            &request.to_xml(),
            state.relay_state.clone(),
        )
    }

    /// Builds a logout request to `idp`'s single logout endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the IdP has no redirect SLO endpoint or signing fails.
    pub fn logout_request(
        &self,
        idp: &IdpMetadata,
        name_id: &NameId,
        session_index: Option<&str>,
        extensions: &[Extension],
        relay_state: Option<String>,
    ) -> SamlResult<SignedMessage> {
        let mut request = LogoutRequest::new(self.issuer, idp.slo_location()?, name_id.clone())
            .with_extensions(extensions.iter().cloned());
        if let Some(index) = session_index {
            request = request.with_session_index(index);
        }

        self.finish(
            MessageKind::LogoutRequest,
            request.id.clone(),
            request.destination.clone(),
            &request.to_xml(),
            relay_state,
        )
    }

    fn finish(
        &self,
        kind: MessageKind,
        id: String,
        destination: String,
        xml: &str,
        relay_state: Option<String>,
    ) -> SamlResult<SignedMessage> {
        let redirect_url =
            HttpRedirectBinding::encode_request(xml, &destination, relay_state.as_deref(), self.signer)?;
        let xml = self.signer.sign_xml(xml, &id)?;
        Ok(SignedMessage {
            kind,
            id,
            destination,
            xml,
            redirect_url,
            relay_state,
        })
    }
}
