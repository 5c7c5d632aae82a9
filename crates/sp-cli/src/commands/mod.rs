//! Command implementations.

pub mod authn_request;
pub mod metadata;
pub mod sources;
pub mod validate;

pub use authn_request::run_authn_request;
pub use metadata::run_metadata;
pub use sources::run_sources;
pub use validate::run_validate;

use std::sync::Arc;

use sp_protocol_saml::{InMemoryMetadataStore, MetadataLookup};

/// Lookup with no IdPs, for commands that never contact one.
fn no_idps() -> Arc<dyn MetadataLookup> {
    Arc::new(InMemoryMetadataStore::new())
}
