//! Shared state of the SP endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::auth_source::SpAuthSource;
use crate::error::{SamlError, SamlResult};

/// The configured sources, keyed by source ID.
#[derive(Clone, Default)]
pub struct SpState {
    sources: Arc<BTreeMap<String, Arc<SpAuthSource>>>,
}

impl SpState {
    /// Creates endpoint state over `sources`.
    #[must_use]
    pub fn new(sources: BTreeMap<String, Arc<SpAuthSource>>) -> Self {
        Self {
            sources: Arc::new(sources),
        }
    }

    /// Looks up a source.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::UnknownSource`] if no source has this ID.
    pub fn source(&self, source_id: &str) -> SamlResult<&Arc<SpAuthSource>> {
        self.sources
            .get(source_id)
            .ok_or_else(|| SamlError::UnknownSource(source_id.to_string()))
    }

    /// Source IDs in order.
    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}
