//! Per-request authentication state.
//!
//! The state travels with one login or logout attempt. When the user is sent
//! to a discovery service it is parked in a [`StateStore`] and picked up again
//! when the discovery response arrives.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::{SamlError, SamlResult};
use crate::types::{AuthnContextComparison, Extension, NameId};

/// Options and overrides for one authentication attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeState {
    /// IdP to use, overriding the configured one.
    pub idp: Option<String>,

    /// Scoping list, overriding configuration and IdP metadata.
    pub idp_list: Vec<String>,

    /// Subject to request authentication for.
    pub name_id: Option<NameId>,

    /// Require fresh authentication at the IdP.
    pub force_authn: bool,

    /// Forbid user interaction at the IdP.
    pub is_passive: bool,

    /// Requested authentication context class references.
    pub authn_context_class_ref: Vec<String>,

    /// How the IdP should compare the requested context classes.
    pub authn_context_comparison: AuthnContextComparison,

    /// Extension elements added to the request.
    pub extensions: Vec<Extension>,

    /// Opaque value echoed back by the IdP.
    pub relay_state: Option<String>,
}

impl RuntimeState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the IdP override.
    #[must_use]
    pub fn with_idp(mut self, idp: impl Into<String>) -> Self {
        self.idp = Some(idp.into());
        self
    }

    /// Sets the scoping list override.
    #[must_use]
    pub fn with_idp_list(mut self, idps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.idp_list = idps.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn with_name_id(mut self, name_id: NameId) -> Self {
        self.name_id = Some(name_id);
        self
    }

    /// Adds an extension element.
    #[must_use]
    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Sets the relay state.
    #[must_use]
    pub fn with_relay_state(mut self, relay_state: impl Into<String>) -> Self {
        self.relay_state = Some(relay_state.into());
        self
    }
}

/// Parks authentication state across a discovery round trip.
pub trait StateStore: Send + Sync {
    /// Stores `state` and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be stored.
    fn save(&self, state: RuntimeState) -> SamlResult<String>;

    /// Removes and returns the state stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::StateNotFound`] for unknown or expired identifiers.
    fn take(&self, id: &str) -> SamlResult<RuntimeState>;
}

/// Default lifetime of parked state.
pub const DEFAULT_STATE_TTL_SECS: i64 = 900;

/// In-memory state store with expiry.
#[derive(Debug)]
pub struct InMemoryStateStore {
    entries: DashMap<String, (DateTime<Utc>, RuntimeState)>,
    ttl: Duration,
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_STATE_TTL_SECS))
    }
}

impl InMemoryStateStore {
    /// Creates a store whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Drops expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, (expires, _)| *expires > now);
        before - self.entries.len()
    }

    /// Number of stored entries, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for InMemoryStateStore {
    fn save(&self, state: RuntimeState) -> SamlResult<String> {
        let purged = self.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "dropped expired authentication state");
        }
        let id = format!("_{}", uuid::Uuid::new_v4().simple());
        self.entries
            .insert(id.clone(), (Utc::now() + self.ttl, state));
        Ok(id)
    }

    fn take(&self, id: &str) -> SamlResult<RuntimeState> {
        match self.entries.remove(id) {
            Some((_, (expires, state))) if expires > Utc::now() => Ok(state),
            Some(_) => {
                tracing::debug!(state_id = id, "authentication state expired");
                Err(SamlError::StateNotFound(id.to_string()))
            }
            None => Err(SamlError::StateNotFound(id.to_string())),
        }
    }
}
