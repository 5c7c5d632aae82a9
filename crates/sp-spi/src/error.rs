//! Error type for module operations.

use thiserror::Error;

/// Result alias for module operations.
pub type SpiResult<T> = Result<T, SpiError>;

/// Error type for module operations.
#[derive(Debug, Error)]
pub enum SpiError {
    /// Identifier is not of the form `<module>:<name>`.
    #[error("invalid identifier '{0}', expected '<module>:<name>'")]
    InvalidId(String),

    /// Module is not installed.
    #[error("module '{0}' is not installed")]
    ModuleNotInstalled(String),

    /// Module is installed but disabled.
    #[error("module '{0}' is not enabled")]
    ModuleDisabled(String),

    /// No factory registered under the given name.
    #[error("module '{module}' has no '{name}'")]
    UnknownFactory {
        /// Module name.
        module: String,
        /// Factory name.
        name: String,
    },

    /// A factory or hook exists but has a different type.
    #[error("'{id}' is not a {expected}")]
    TypeMismatch {
        /// Identifier of the factory or hook.
        id: String,
        /// Expected type name.
        expected: &'static str,
    },

    /// A hook reported a failure.
    #[error("hook '{hook}' of module '{module}' failed: {message}")]
    HookFailed {
        /// Module name.
        module: String,
        /// Hook name.
        hook: String,
        /// Failure message.
        message: String,
    },

    /// A factory could not create its product.
    #[error("creation failed: {0}")]
    CreationFailed(String),
}

/// Splits `<module>:<name>`.
///
/// # Errors
///
/// Returns [`SpiError::InvalidId`] when either part is missing.
pub fn split_id(id: &str) -> SpiResult<(&str, &str)> {
    match id.split_once(':') {
        Some((module, name)) if !module.is_empty() && !name.is_empty() => Ok((module, name)),
        _ => Err(SpiError::InvalidId(id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_valid_id() {
        assert_eq!(split_id("saml:SP").unwrap(), ("saml", "SP"));
    }

    #[test]
    fn split_invalid_ids() {
        for id in ["saml", ":SP", "saml:", ""] {
            assert!(matches!(split_id(id), Err(SpiError::InvalidId(_))), "{id}");
        }
    }
}
