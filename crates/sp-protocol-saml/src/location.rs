//! Well-known URLs of a hosted service provider.

use crate::types::SamlBinding;

/// URL layout of one authentication source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpLocations {
    base_url: String,
    source_id: String,
}

impl SpLocations {
    /// Creates the layout for `source_id` under `base_url`.
    #[must_use]
    pub fn new(base_url: &str, source_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            source_id: source_id.into(),
        }
    }

    /// SAML 2.0 assertion consumer service.
    #[must_use]
    pub fn acs(&self) -> String {
        format!("{}/saml/sp/acs/{}", self.base_url, self.source_id)
    }

    /// Assertion consumer service for `binding`. SAML 1.x profiles have
    /// their own consumer, with artifacts on a sub-path.
    #[must_use]
    pub fn acs_for(&self, binding: SamlBinding) -> String {
        match binding {
            SamlBinding::Saml1BrowserPost => self.saml1_acs(),
            SamlBinding::Saml1Artifact => format!("{}/artifact", self.saml1_acs()),
            _ => self.acs(),
        }
    }

    fn saml1_acs(&self) -> String {
        format!("{}/saml/sp/saml1-acs/{}", self.base_url, self.source_id)
    }

    /// Single logout service.
    #[must_use]
    pub fn slo(&self) -> String {
        format!("{}/saml/sp/slo/{}", self.base_url, self.source_id)
    }

    /// Hosted metadata.
    #[must_use]
    pub fn metadata(&self) -> String {
        format!("{}/saml/sp/metadata/{}", self.base_url, self.source_id)
    }

    /// Built-in discovery service.
    #[must_use]
    pub fn discovery(&self) -> String {
        format!("{}/saml/disco", self.base_url)
    }

    /// Where the discovery service returns the user for parked state `state_id`.
    #[must_use]
    pub fn discovery_response(&self, state_id: &str) -> String {
        format!(
            "{}/saml/sp/discoresp/{}?AuthID={}",
            self.base_url,
            self.source_id,
            urlencoding::encode(state_id)
        )
    }
}
