//! Scoping lists and the precedence used to pick one.
//!
//! Three sources can name the IdPs a request is scoped to: the runtime state
//! of the current request, the SP configuration and the target IdP's
//! metadata. The first non-empty source wins outright; lists are never merged.

use serde::{Deserialize, Serialize};

use crate::xml::escape;

/// An ordered, duplicate-free list of IdP entity IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ScopeList(Vec<String>);

impl ScopeList {
    /// Builds a list, dropping repeated and empty entries.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Vec::new();
        for entry in entries {
            let entry = entry.into();
            if !entry.is_empty() && !list.contains(&entry) {
                list.push(entry);
            }
        }
        Self(list)
    }

    /// Returns true when no IdP is named.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if `entity_id` is in the list.
    #[must_use]
    pub fn contains(&self, entity_id: &str) -> bool {
        self.0.iter().any(|e| e == entity_id)
    }

    /// Iterates over entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the entries.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Renders `<samlp:Scoping>`, or nothing for an empty list.
    #[must_use]
    pub fn to_xml(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let entries: String = self
            .0
            .iter()
            .map(|id| format!(r#"<samlp:IDPEntry ProviderID="{}"/>"#, escape(id)))
            .collect();
        format!("<samlp:Scoping><samlp:IDPList>{entries}</samlp:IDPList></samlp:Scoping>")
    }
}

impl From<Vec<String>> for ScopeList {
    fn from(entries: Vec<String>) -> Self {
        Self::new(entries)
    }
}

impl From<ScopeList> for Vec<String> {
    fn from(list: ScopeList) -> Self {
        list.0
    }
}

impl<S: Into<String>> FromIterator<S> for ScopeList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Picks the scoping list for a request.
///
/// Precedence is runtime state, then SP configuration, then IdP metadata.
#[must_use]
pub fn resolve_scope(runtime: &[String], sp_config: &[String], idp_metadata: &[String]) -> ScopeList {
    [runtime, sp_config, idp_metadata]
        .into_iter()
        .map(|source| ScopeList::new(source.iter().cloned()))
        .find(|list| !list.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn runtime_list_wins() {
        let scope = resolve_scope(&v(&["state"]), &v(&["config"]), &v(&["metadata"]));
        assert_eq!(scope.as_slice(), v(&["state"]).as_slice());
    }

    #[test]
    fn config_list_beats_metadata() {
        let scope = resolve_scope(&[], &v(&["config"]), &v(&["metadata"]));
        assert_eq!(scope.as_slice(), v(&["config"]).as_slice());
    }

    #[test]
    fn metadata_list_is_last_resort() {
        let scope = resolve_scope(&[], &[], &v(&["metadata"]));
        assert_eq!(scope.as_slice(), v(&["metadata"]).as_slice());
        assert!(resolve_scope(&[], &[], &[]).is_empty());
    }

    #[test]
    fn lists_are_not_merged() {
        let scope = resolve_scope(&v(&["a"]), &v(&["b", "c"]), &[]);
        assert_eq!(scope.len(), 1);
        assert!(!scope.contains("b"));
    }

    #[test]
    fn duplicates_are_dropped_keeping_first_position() {
        let scope = ScopeList::new(["b", "a", "b", "", "a"]);
        assert_eq!(scope.as_slice(), v(&["b", "a"]).as_slice());
    }

    #[test]
    fn empty_list_renders_nothing() {
        assert_eq!(ScopeList::default().to_xml(), "");
        let xml = ScopeList::new(["urn:x"]).to_xml();
        assert_eq!(
            xml,
            r#"<samlp:Scoping><samlp:IDPList><samlp:IDPEntry ProviderID="urn:x"/></samlp:IDPList></samlp:Scoping>"#
        );
    }
}
