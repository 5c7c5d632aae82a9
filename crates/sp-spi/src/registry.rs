//! The module registry handed to authentication sources.

use std::collections::BTreeMap;

use crate::error::{split_id, SpiResult};
use crate::factory::FactoryRegistry;
use crate::hooks::HookRegistry;
use crate::module::ModuleSet;

/// Installed modules together with their hooks and factories.
///
/// Registering a hook or factory installs its module.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: ModuleSet,
    hooks: HookRegistry,
    factories: FactoryRegistry,
}

impl ModuleRegistry {
    /// Creates a registry with the given enablement flags.
    #[must_use]
    pub fn new(flags: BTreeMap<String, bool>) -> Self {
        Self {
            modules: ModuleSet::new(flags),
            hooks: HookRegistry::new(),
            factories: FactoryRegistry::new(),
        }
    }

    /// Returns the module set.
    #[must_use]
    pub const fn modules(&self) -> &ModuleSet {
        &self.modules
    }

    /// Installs a module without registering anything for it.
    pub fn install(&self, module: &str) {
        self.modules.install(module);
    }

    /// Returns true if the module is installed and enabled.
    #[must_use]
    pub fn is_enabled(&self, module: &str) -> bool {
        self.modules.is_enabled(module)
    }

    /// Registers a hook for `module`.
    pub fn register_hook<T, F>(&self, module: &str, hook: &str, f: F)
    where
        T: 'static,
        F: Fn(&mut T) -> SpiResult<()> + Send + Sync + 'static,
    {
        self.modules.install(module);
        self.hooks.register::<T, F>(module, hook, f);
    }

    /// Runs a hook for every enabled module, in module-name order.
    ///
    /// # Errors
    ///
    /// See [`HookRegistry::call`].
    pub fn call_hooks<T: 'static>(&self, hook: &str, data: &mut T) -> SpiResult<usize> {
        self.hooks.call(hook, data, &self.modules)
    }

    /// Registers a factory under `<module>:<name>`.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed identifier.
    pub fn register_factory<A, T, F>(&self, id: &str, f: F) -> SpiResult<()>
    where
        A: 'static,
        T: 'static,
        F: Fn(A) -> SpiResult<T> + Send + Sync + 'static,
    {
        let (module, _) = split_id(id)?;
        self.modules.install(module);
        self.factories.register::<A, T, F>(id, f)
    }

    /// Resolves `<module>:<name>` and runs the factory.
    ///
    /// # Errors
    ///
    /// See [`FactoryRegistry::create`].
    pub fn create<A: 'static, T: 'static>(&self, id: &str, args: A) -> SpiResult<T> {
        self.factories.create(id, args, &self.modules)
    }

    /// Lists factory names of a module.
    #[must_use]
    pub fn factory_names(&self, module: &str) -> Vec<String> {
        self.factories.names(module)
    }
}
