//! Installed modules and their enablement.

use std::collections::{BTreeMap, BTreeSet};

use dashmap::DashMap;
use parking_lot::RwLock;

/// Modules enabled unless configuration says otherwise.
pub const DEFAULT_ENABLED: [&str; 2] = ["core", "saml"];

/// Set of installed modules with a memoised enablement lookup.
///
/// Enablement is computed once per module from the configured flags and then
/// served from the cache. Installing a module drops its cached answer.
#[derive(Debug, Default)]
pub struct ModuleSet {
    installed: RwLock<BTreeSet<String>>,
    flags: BTreeMap<String, bool>,
    cache: DashMap<String, bool>,
}

impl ModuleSet {
    /// Creates a set with the given enablement flags and no installed modules.
    #[must_use]
    pub fn new(flags: BTreeMap<String, bool>) -> Self {
        Self {
            installed: RwLock::new(BTreeSet::new()),
            flags,
            cache: DashMap::new(),
        }
    }

    /// Marks a module as installed.
    pub fn install(&self, module: &str) {
        let mut installed = self.installed.write();
        if installed.insert(module.to_string()) {
            self.cache.remove(module);
            drop(installed);
            tracing::debug!(module, "Module installed");
        }
    }

    /// Returns true if the module is installed.
    #[must_use]
    pub fn is_installed(&self, module: &str) -> bool {
        self.installed.read().contains(module)
    }

    /// Returns the installed modules in sorted order.
    #[must_use]
    pub fn installed(&self) -> Vec<String> {
        self.installed.read().iter().cloned().collect()
    }

    /// Returns true if the module is installed and enabled.
    ///
    /// An explicit flag wins; otherwise only the default modules are enabled.
    #[must_use]
    pub fn is_enabled(&self, module: &str) -> bool {
        if let Some(cached) = self.cache.get(module) {
            return *cached;
        }

        // Held until the cache entry is written so `install` cannot slip in between.
        let installed = self.installed.read();
        let enabled = installed.contains(module)
            && self
                .flags
                .get(module)
                .copied()
                .unwrap_or_else(|| DEFAULT_ENABLED.contains(&module));

        self.cache.insert(module.to_string(), enabled);
        enabled
    }

    /// Returns the installed and enabled modules in sorted order.
    #[must_use]
    pub fn enabled(&self) -> Vec<String> {
        self.installed()
            .into_iter()
            .filter(|m| self.is_enabled(m))
            .collect()
    }
}
