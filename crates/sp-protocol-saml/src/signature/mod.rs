//! XML Signature support for outgoing SAML messages.
//!
//! Messages are signed twice over, depending on the transport: an enveloped
//! `<ds:Signature>` for bindings that carry the XML as is, and a detached
//! signature over the query string for the HTTP-Redirect binding.
//!
//! # Signing Algorithms
//!
//! - RSA-SHA256 (default)
//! - RSA-SHA384
//! - RSA-SHA512

mod signer;

pub use signer::*;

use sp_crypto::{DigestAlgorithm, RsaAlgorithm};

use crate::error::SamlResult;
use crate::types::{digest_algorithms, signature_algorithms};

/// Signature algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureAlgorithm {
    /// RSA with SHA-256.
    #[default]
    RsaSha256,
    /// RSA with SHA-384.
    RsaSha384,
    /// RSA with SHA-512.
    RsaSha512,
}

impl SignatureAlgorithm {
    /// Returns the URI for this signature algorithm.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::RsaSha256 => signature_algorithms::RSA_SHA256,
            Self::RsaSha384 => signature_algorithms::RSA_SHA384,
            Self::RsaSha512 => signature_algorithms::RSA_SHA512,
        }
    }

    /// Returns the corresponding digest algorithm URI.
    #[must_use]
    pub const fn digest_uri(&self) -> &'static str {
        match self {
            Self::RsaSha256 => digest_algorithms::SHA256,
            Self::RsaSha384 => digest_algorithms::SHA384,
            Self::RsaSha512 => digest_algorithms::SHA512,
        }
    }

    /// Parses a signature algorithm from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            signature_algorithms::RSA_SHA256 => Some(Self::RsaSha256),
            signature_algorithms::RSA_SHA384 => Some(Self::RsaSha384),
            signature_algorithms::RSA_SHA512 => Some(Self::RsaSha512),
            _ => None,
        }
    }

    const fn rsa(self) -> RsaAlgorithm {
        match self {
            Self::RsaSha256 => RsaAlgorithm::Rs256,
            Self::RsaSha384 => RsaAlgorithm::Rs384,
            Self::RsaSha512 => RsaAlgorithm::Rs512,
        }
    }

    const fn digest(self) -> DigestAlgorithm {
        match self {
            Self::RsaSha256 => DigestAlgorithm::Sha256,
            Self::RsaSha384 => DigestAlgorithm::Sha384,
            Self::RsaSha512 => DigestAlgorithm::Sha512,
        }
    }
}

/// Signs outgoing protocol messages.
pub trait MessageSigner: Send + Sync {
    /// Inserts an enveloped signature over the element whose `ID` is `reference_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is missing or the key cannot sign.
    fn sign_xml(&self, xml: &str, reference_id: &str) -> SamlResult<String>;

    /// Appends `SigAlg` and `Signature` to an HTTP-Redirect query string.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot sign.
    fn sign_redirect_query(&self, query: &str) -> SamlResult<String>;
}

/// Signer for service providers without a key pair: messages pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsigned;

impl MessageSigner for Unsigned {
    fn sign_xml(&self, xml: &str, _reference_id: &str) -> SamlResult<String> {
        Ok(xml.to_string())
    }

    fn sign_redirect_query(&self, query: &str) -> SamlResult<String> {
        Ok(query.to_string())
    }
}
