//! # sp-crypto
//!
//! Cryptographic primitives for the SAML service provider using aws-lc-rs.
//!
//! - Message digests for XML-DSig references
//! - RSA PKCS#1 v1.5 signing and verification
//! - PEM decoding of keys and certificates

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod hash;
pub mod pem;
pub mod rsa;

pub use error::CryptoError;
pub use hash::{digest, sha256, sha384, sha512, DigestAlgorithm};
pub use pem::{certificate_base64, pem_to_der, private_key_der};
pub use rsa::{rsa_sign, rsa_verify, RsaAlgorithm};
