//! SAML 2.0 types and data structures.
//!
//! Outgoing protocol messages, the pieces they are made of, and the view of a
//! remote identity provider's metadata this service provider relies on.

mod authn_request;
mod constants;
mod extensions;
mod idp;
mod logout;
mod name_id;

pub use authn_request::*;
pub use constants::*;
pub use extensions::*;
pub use idp::*;
pub use logout::*;
pub use name_id::*;
