//! Transport encodings for outgoing messages.
//!
//! - **HTTP-Redirect Binding** - messages are deflated, base64-encoded and
//!   URL-encoded, with a detached signature over the query string
//! - **Discovery** - the IdP discovery protocol redirect, with the
//!   candidate list appended as `IDPList[]` parameters

mod discovery;
mod redirect;

pub use discovery::*;
pub use redirect::*;

/// SAML message type for binding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamlMessageType {
    /// Request message.
    Request,
    /// Response message.
    Response,
}

impl SamlMessageType {
    /// Returns the query parameter name for this message type.
    #[must_use]
    pub const fn param(&self) -> &'static str {
        match self {
            Self::Request => "SAMLRequest",
            Self::Response => "SAMLResponse",
        }
    }
}
