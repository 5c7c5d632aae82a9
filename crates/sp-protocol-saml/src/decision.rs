//! Deciding whether a request goes straight to an IdP or through discovery.

use crate::error::{SamlError, SamlResult};
use crate::lookup::MetadataLookup;
use crate::scope::ScopeList;

/// Where an authentication request goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Send an authentication request to this IdP.
    Proceed(String),
    /// Let the user choose among these IdPs. An empty list means any known IdP.
    Redirect(Vec<String>),
}

/// Applies the selection rules to a candidate list.
///
/// 1. Entries without trusted metadata are dropped; order is kept.
/// 2. With a fixed IdP, it must be among what remains.
/// 3. Otherwise one candidate proceeds and several go to discovery.
///
/// An empty candidate list puts no constraint on the choice: a fixed IdP
/// proceeds and anything else goes to discovery.
///
/// # Errors
///
/// [`SamlError::NoSupportedIdp`] when no candidate has trusted metadata, and
/// [`SamlError::NoAvailableIdp`] when the fixed IdP is not a surviving candidate.
pub fn decide(
    candidates: &ScopeList,
    fixed_idp: Option<&str>,
    lookup: &dyn MetadataLookup,
) -> SamlResult<Destination> {
    if candidates.is_empty() {
        return Ok(match fixed_idp {
            Some(idp) => Destination::Proceed(idp.to_string()),
            None => Destination::Redirect(Vec::new()),
        });
    }

    let mut known: Vec<String> = candidates
        .iter()
        .filter(|id| lookup.exists(id))
        .map(ToString::to_string)
        .collect();
    tracing::debug!(
        candidates = candidates.len(),
        known = known.len(),
        fixed_idp,
        "filtered IdP candidates"
    );

    if known.is_empty() {
        return Err(SamlError::NoSupportedIdp {
            requested: candidates.as_slice().to_vec(),
        });
    }

    match fixed_idp {
        Some(idp) if known.iter().any(|k| k == idp) => Ok(Destination::Proceed(idp.to_string())),
        Some(idp) => Err(SamlError::NoAvailableIdp {
            idp: idp.to_string(),
            candidates: known,
        }),
        None if known.len() == 1 => Ok(Destination::Proceed(known.swap_remove(0))),
        None => Ok(Destination::Redirect(known)),
    }
}
