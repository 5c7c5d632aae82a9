//! The parts of a remote identity provider's metadata the SP relies on.

use serde::{Deserialize, Serialize};

use super::SamlBinding;
use crate::error::{SamlError, SamlResult};

/// A protocol endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Binding URI.
    pub binding: String,
    /// Endpoint URL.
    pub location: String,
}

impl Endpoint {
    /// Creates a new endpoint.
    #[must_use]
    pub fn new(binding: SamlBinding, location: impl Into<String>) -> Self {
        Self {
            binding: binding.uri().to_string(),
            location: location.into(),
        }
    }
}

/// Metadata of a remote identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdpMetadata {
    /// Entity ID of the IdP.
    pub entity_id: String,

    /// Single sign-on endpoints.
    #[serde(default)]
    pub single_sign_on_services: Vec<Endpoint>,

    /// Single logout endpoints.
    #[serde(default)]
    pub single_logout_services: Vec<Endpoint>,

    /// IdPs this IdP asks requesters to scope to.
    #[serde(default)]
    pub idp_list: Vec<String>,

    /// Base64 signing certificates.
    #[serde(default)]
    pub signing_certificates: Vec<String>,
}

impl IdpMetadata {
    /// Creates metadata with no endpoints.
    #[must_use]
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            single_sign_on_services: Vec::new(),
            single_logout_services: Vec::new(),
            idp_list: Vec::new(),
            signing_certificates: Vec::new(),
        }
    }

    /// Adds a single sign-on endpoint.
    #[must_use]
    pub fn with_sso(mut self, binding: SamlBinding, location: impl Into<String>) -> Self {
        self.single_sign_on_services.push(Endpoint::new(binding, location));
        self
    }

    /// Adds a single logout endpoint.
    #[must_use]
    pub fn with_slo(mut self, binding: SamlBinding, location: impl Into<String>) -> Self {
        self.single_logout_services.push(Endpoint::new(binding, location));
        self
    }

    /// Sets the scoping list the IdP publishes.
    #[must_use]
    pub fn with_idp_list(mut self, idps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.idp_list = idps.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the HTTP-Redirect single sign-on location.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::MissingEndpoint`] when the IdP publishes none.
    pub fn sso_location(&self) -> SamlResult<&str> {
        redirect_location(&self.single_sign_on_services).ok_or_else(|| {
            SamlError::MissingEndpoint {
                entity_id: self.entity_id.clone(),
                service: "SingleSignOnService",
            }
        })
    }

    /// Returns the HTTP-Redirect single logout location.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::MissingEndpoint`] when the IdP publishes none.
    pub fn slo_location(&self) -> SamlResult<&str> {
        redirect_location(&self.single_logout_services).ok_or_else(|| {
            SamlError::MissingEndpoint {
                entity_id: self.entity_id.clone(),
                service: "SingleLogoutService",
            }
        })
    }
}

fn redirect_location(endpoints: &[Endpoint]) -> Option<&str> {
    endpoints
        .iter()
        .find(|e| e.binding == SamlBinding::HttpRedirect.uri())
        .map(|e| e.location.as_str())
}
