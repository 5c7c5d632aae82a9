//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Resource not found.
    #[error("{resource_type} not found: {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// SAML error.
    #[error(transparent)]
    Saml(#[from] sp_protocol_saml::SamlError),

    /// Module registry error.
    #[error("module error: {0}")]
    Module(#[from] sp_spi::SpiError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<sp_core::Error> for CliError {
    fn from(err: sp_core::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
