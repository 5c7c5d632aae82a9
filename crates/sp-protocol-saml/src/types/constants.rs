//! SAML 2.0 constants and URIs.
//!
//! Namespace URIs, binding URIs, name ID formats and status codes used by
//! the service provider.

/// SAML 2.0 assertion namespace URI.
pub const SAML_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// SAML 2.0 protocol namespace URI.
pub const SAMLP_NS: &str = "urn:oasis:names:tc:SAML:2.0:protocol";

/// SAML 2.0 metadata namespace URI.
pub const MD_NS: &str = "urn:oasis:names:tc:SAML:2.0:metadata";

/// Metadata user interface extension namespace URI.
pub const MDUI_NS: &str = "urn:oasis:names:tc:SAML:metadata:ui";

/// Metadata entity attributes extension namespace URI.
pub const MDATTR_NS: &str = "urn:oasis:names:tc:SAML:metadata:attribute";

/// Metadata registration and publication extension namespace URI.
pub const MDRPI_NS: &str = "urn:oasis:names:tc:SAML:metadata:rpi";

/// Holder-of-key web browser SSO profile, also its metadata namespace.
pub const HOLDER_OF_KEY_SSO: &str = "urn:oasis:names:tc:SAML:2.0:profiles:holder-of-key:SSO:browser";

/// XML Digital Signature namespace URI.
pub const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// The only protocol this service provider speaks.
pub const SAML2_PROTOCOL: &str = SAMLP_NS;

/// Sample entity ID shipped in configuration templates.
pub const PLACEHOLDER_ENTITY_ID: &str = "https://myapp.example.org/";

// ============================================================================
// Binding URIs
// ============================================================================

/// Bindings and profiles that may appear in endpoint `Binding` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamlBinding {
    /// HTTP POST binding.
    HttpPost,
    /// HTTP Redirect binding.
    HttpRedirect,
    /// HTTP Artifact binding.
    HttpArtifact,
    /// SOAP binding.
    Soap,
    /// Reverse SOAP (PAOS) binding, used by ECP.
    Paos,
    /// SAML 1.x browser/POST profile.
    Saml1BrowserPost,
    /// SAML 1.x browser/artifact profile.
    Saml1Artifact,
    /// Holder-of-key web browser SSO profile.
    HolderOfKey,
}

impl SamlBinding {
    /// Returns the URI for this binding.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::HttpPost => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST",
            Self::HttpRedirect => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect",
            Self::HttpArtifact => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Artifact",
            Self::Soap => "urn:oasis:names:tc:SAML:2.0:bindings:SOAP",
            Self::Paos => "urn:oasis:names:tc:SAML:2.0:bindings:PAOS",
            Self::Saml1BrowserPost => "urn:oasis:names:tc:SAML:1.0:profiles:browser-post",
            Self::Saml1Artifact => "urn:oasis:names:tc:SAML:1.0:profiles:artifact-01",
            Self::HolderOfKey => HOLDER_OF_KEY_SSO,
        }
    }

    /// Parses a binding from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST" => Some(Self::HttpPost),
            "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect" => Some(Self::HttpRedirect),
            "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Artifact" => Some(Self::HttpArtifact),
            "urn:oasis:names:tc:SAML:2.0:bindings:SOAP" => Some(Self::Soap),
            "urn:oasis:names:tc:SAML:2.0:bindings:PAOS" => Some(Self::Paos),
            "urn:oasis:names:tc:SAML:1.0:profiles:browser-post" => Some(Self::Saml1BrowserPost),
            "urn:oasis:names:tc:SAML:1.0:profiles:artifact-01" => Some(Self::Saml1Artifact),
            HOLDER_OF_KEY_SSO => Some(Self::HolderOfKey),
            _ => None,
        }
    }

    /// Returns true for bindings an assertion consumer endpoint can be synthesized for.
    #[must_use]
    pub const fn is_acs_binding(&self) -> bool {
        matches!(
            self,
            Self::HttpPost
                | Self::HttpArtifact
                | Self::Paos
                | Self::Saml1BrowserPost
                | Self::Saml1Artifact
        )
    }
}

// ============================================================================
// Name ID Formats
// ============================================================================

/// SAML Name ID formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameIdFormat {
    /// Unspecified name ID format.
    Unspecified,
    /// Email address format.
    Email,
    /// Entity identifier format.
    Entity,
    /// Persistent identifier format.
    Persistent,
    /// Transient identifier format.
    #[default]
    Transient,
}

impl NameIdFormat {
    /// Returns the URI for this name ID format.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Unspecified => "urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified",
            Self::Email => "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress",
            Self::Entity => "urn:oasis:names:tc:SAML:2.0:nameid-format:entity",
            Self::Persistent => "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent",
            Self::Transient => "urn:oasis:names:tc:SAML:2.0:nameid-format:transient",
        }
    }

    /// Parses a name ID format from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            "urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified" => Some(Self::Unspecified),
            "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress" => Some(Self::Email),
            "urn:oasis:names:tc:SAML:2.0:nameid-format:entity" => Some(Self::Entity),
            "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent" => Some(Self::Persistent),
            "urn:oasis:names:tc:SAML:2.0:nameid-format:transient" => Some(Self::Transient),
            _ => None,
        }
    }
}

// ============================================================================
// Status Codes
// ============================================================================

/// Top-level SAML status codes.
pub mod status_codes {
    /// Requester error status code.
    pub const REQUESTER: &str = "urn:oasis:names:tc:SAML:2.0:status:Requester";

    /// Responder error status code.
    pub const RESPONDER: &str = "urn:oasis:names:tc:SAML:2.0:status:Responder";
}

/// Second-level SAML status codes.
pub mod sub_status_codes {
    /// No available IDP.
    pub const NO_AVAILABLE_IDP: &str = "urn:oasis:names:tc:SAML:2.0:status:NoAvailableIDP";

    /// No supported IDP.
    pub const NO_SUPPORTED_IDP: &str = "urn:oasis:names:tc:SAML:2.0:status:NoSupportedIDP";
}

// ============================================================================
// Signature Algorithms
// ============================================================================

/// XML signature algorithms.
pub mod signature_algorithms {
    /// RSA-SHA256 signature algorithm.
    pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";

    /// RSA-SHA384 signature algorithm.
    pub const RSA_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384";

    /// RSA-SHA512 signature algorithm.
    pub const RSA_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512";
}

/// Digest algorithms.
pub mod digest_algorithms {
    /// SHA-256 digest algorithm.
    pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";

    /// SHA-384 digest algorithm.
    pub const SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#sha384";

    /// SHA-512 digest algorithm.
    pub const SHA512: &str = "http://www.w3.org/2001/04/xmlenc#sha512";
}

/// Exclusive C14N without comments.
pub const EXCLUSIVE_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";

/// Enveloped signature transform.
pub const ENVELOPED_SIGNATURE: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_uri_roundtrip() {
        for binding in [
            SamlBinding::HttpPost,
            SamlBinding::HttpRedirect,
            SamlBinding::HttpArtifact,
            SamlBinding::Soap,
            SamlBinding::Paos,
            SamlBinding::Saml1BrowserPost,
            SamlBinding::Saml1Artifact,
            SamlBinding::HolderOfKey,
        ] {
            assert_eq!(SamlBinding::from_uri(binding.uri()), Some(binding));
        }
        assert_eq!(SamlBinding::from_uri("urn:this:doesnotexist"), None);
    }

    #[test]
    fn acs_bindings() {
        assert!(SamlBinding::HttpPost.is_acs_binding());
        assert!(SamlBinding::Saml1BrowserPost.is_acs_binding());
        assert!(!SamlBinding::HttpRedirect.is_acs_binding());
        assert!(!SamlBinding::HolderOfKey.is_acs_binding());
    }

    #[test]
    fn default_name_id_format_is_transient() {
        assert_eq!(
            NameIdFormat::default().uri(),
            "urn:oasis:names:tc:SAML:2.0:nameid-format:transient"
        );
    }
}
