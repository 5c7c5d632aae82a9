//! SAML error types.
//!
//! Errors raised while choosing an identity provider, building protocol
//! messages and synthesizing hosted metadata.

use thiserror::Error;

use crate::types::{status_codes, sub_status_codes};

/// Result type for SAML operations.
pub type SamlResult<T> = Result<T, SamlError>;

/// SAML service provider errors.
#[derive(Debug, Error)]
pub enum SamlError {
    /// None of the requested identity providers is known.
    #[error("no supported identity provider among [{}]", .requested.join(", "))]
    NoSupportedIdp {
        /// The entity IDs that were requested.
        requested: Vec<String>,
    },

    /// Known identity providers conflict with the fixed one.
    #[error("identity provider {idp} is not among the available [{}]", .candidates.join(", "))]
    NoAvailableIdp {
        /// The configured identity provider.
        idp: String,
        /// The known candidates.
        candidates: Vec<String>,
    },

    /// Malformed configuration.
    #[error("{0}")]
    Validation(String),

    /// Remote metadata lacks a required endpoint.
    #[error("{entity_id} has no {service} endpoint")]
    MissingEndpoint {
        /// Entity ID of the remote party.
        entity_id: String,
        /// Name of the missing service.
        service: &'static str,
    },

    /// XML signature creation failed.
    #[error("signature creation failed: {0}")]
    SignatureCreation(String),

    /// Key material unusable.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// A redirect target is not an HTTP(S) URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Unknown identity provider.
    #[error("unknown identity provider: {0}")]
    UnknownIdentityProvider(String),

    /// Unknown authentication source.
    #[error("unknown authentication source: {0}")]
    UnknownSource(String),

    /// Saved authentication state is missing or expired.
    #[error("authentication state not found: {0}")]
    StateNotFound(String),

    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Deflate compression error.
    #[error("deflate error: {0}")]
    Deflate(String),

    /// Module system error.
    #[error("module error: {0}")]
    Module(#[from] sp_spi::SpiError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SamlError {
    /// Returns the top-level SAML status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> &'static str {
        match self {
            Self::XmlParse(_) | Self::StateNotFound(_) | Self::UnknownIdentityProvider(_) => {
                status_codes::REQUESTER
            }
            _ => status_codes::RESPONDER,
        }
    }

    /// Returns a second-level status code if applicable.
    #[must_use]
    pub const fn sub_status_code(&self) -> Option<&'static str> {
        match self {
            Self::NoSupportedIdp { .. } => Some(sub_status_codes::NO_SUPPORTED_IDP),
            Self::NoAvailableIdp { .. } => Some(sub_status_codes::NO_AVAILABLE_IDP),
            _ => None,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::NoSupportedIdp { .. } | Self::XmlParse(_) | Self::StateNotFound(_) => 400,
            Self::UnknownIdentityProvider(_) | Self::UnknownSource(_) => 404,
            _ => 500,
        }
    }
}

impl From<quick_xml::Error> for SamlError {
    fn from(err: quick_xml::Error) -> Self {
        Self::XmlParse(err.to_string())
    }
}

impl From<sp_crypto::CryptoError> for SamlError {
    fn from(err: sp_crypto::CryptoError) -> Self {
        Self::Crypto(err.to_string())
    }
}

impl From<sp_core::Error> for SamlError {
    fn from(err: sp_core::Error) -> Self {
        Self::Config(err.to_string())
    }
}
