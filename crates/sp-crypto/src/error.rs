//! Error type for cryptographic operations.

use thiserror::Error;

/// Error type for cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Signing failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Invalid key format.
    #[error("invalid key format: {0}")]
    InvalidKey(String),

    /// PEM block missing or undecodable.
    #[error("invalid PEM: {0}")]
    InvalidPem(String),
}
