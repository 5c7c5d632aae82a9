//! Lookup of remote IdP metadata.

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{SamlError, SamlResult};
use crate::types::IdpMetadata;

/// Source of trusted IdP metadata.
pub trait MetadataLookup: Send + Sync {
    /// Returns true if metadata for `entity_id` is known.
    fn exists(&self, entity_id: &str) -> bool;

    /// Returns the metadata for `entity_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::UnknownIdentityProvider`] if the entity is not known.
    fn get(&self, entity_id: &str) -> SamlResult<Arc<IdpMetadata>>;

    /// Entity IDs of every known IdP, sorted.
    fn entity_ids(&self) -> Vec<String>;
}

/// In-memory metadata set.
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    entries: DashMap<String, Arc<IdpMetadata>>,
}

impl InMemoryMetadataStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entry.
    pub fn insert(&self, metadata: IdpMetadata) {
        tracing::debug!(entity_id = %metadata.entity_id, "IdP metadata loaded");
        self.entries
            .insert(metadata.entity_id.clone(), Arc::new(metadata));
    }

    /// Removes an entry.
    pub fn remove(&self, entity_id: &str) -> Option<Arc<IdpMetadata>> {
        self.entries.remove(entity_id).map(|(_, v)| v)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<IdpMetadata> for InMemoryMetadataStore {
    fn from_iter<I: IntoIterator<Item = IdpMetadata>>(iter: I) -> Self {
        let store = Self::new();
        for metadata in iter {
            store.insert(metadata);
        }
        store
    }
}

impl MetadataLookup for InMemoryMetadataStore {
    fn exists(&self, entity_id: &str) -> bool {
        self.entries.contains_key(entity_id)
    }

    fn get(&self, entity_id: &str) -> SamlResult<Arc<IdpMetadata>> {
        self.entries
            .get(entity_id)
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| SamlError::UnknownIdentityProvider(entity_id.to_string()))
    }

    fn entity_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }
}
