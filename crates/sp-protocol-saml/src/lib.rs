//! SAML 2.0 service provider authentication source.
//!
//! Decides which identity provider a user is sent to, builds and signs the
//! outgoing `AuthnRequest` and `LogoutRequest` messages, and publishes the
//! hosted SP metadata.
//!
//! # Architecture
//!
//! - [`scope`] - merges the candidate IdP lists into one scoping list
//! - [`decision`] - picks between sending the request and IdP discovery
//! - [`message`] - builds and signs protocol messages
//! - [`metadata`] - synthesizes the hosted metadata document
//! - [`auth_source`] - the `saml:SP` source tying them together
//! - [`endpoints`] - Axum HTTP handlers
//!
//! Metadata lookup, state persistence and message signing are traits
//! ([`MetadataLookup`], [`StateStore`], [`MessageSigner`]) with in-memory
//! and `aws-lc-rs` backed implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use sp_protocol_saml::{AuthnOutcome, RuntimeState, SpAuthSource};
//!
//! let source = SpAuthSource::new("default-sp", config, global, lookup)?;
//! match source.authenticate(RuntimeState::new().with_idp_list(idps))? {
//!     AuthnOutcome::Request(message) => redirect(&message.redirect_url),
//!     AuthnOutcome::Discovery(disco) => redirect(&disco.url),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth_source;
pub mod bindings;
pub mod decision;
pub mod endpoints;
pub mod error;
pub mod location;
pub mod lookup;
pub mod message;
pub mod metadata;
pub mod scope;
pub mod signature;
pub mod state;
pub mod types;
pub mod xml;

pub use auth_source::{AuthnOutcome, LogoutState, SpAuthSource};
pub use decision::{decide, Destination};
pub use error::{SamlError, SamlResult};
pub use lookup::{InMemoryMetadataStore, MetadataLookup};
pub use message::{MessageBuilder, SignedMessage};
pub use metadata::{synthesize, MetadataDocument};
pub use scope::{resolve_scope, ScopeList};
pub use signature::{MessageSigner, XmlSigner};
pub use state::{InMemoryStateStore, RuntimeState, StateStore};
pub use types::*;
