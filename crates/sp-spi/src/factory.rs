//! Factories addressed by `<module>:<name>` identifiers.

use std::any::{type_name, Any};
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{split_id, SpiError, SpiResult};
use crate::module::ModuleSet;

/// A factory turning arguments of type `A` into a `T`.
pub type Factory<A, T> = Arc<dyn Fn(A) -> SpiResult<T> + Send + Sync>;

struct FactoryEntry {
    name: String,
    factory: Arc<dyn Any + Send + Sync>,
}

/// Registry of typed factories, grouped by module.
#[derive(Default)]
pub struct FactoryRegistry {
    factories: DashMap<String, Vec<FactoryEntry>>,
}

impl std::fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("modules", &self.factories.len())
            .finish()
    }
}

impl FactoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `<module>:<name>`, replacing an earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`SpiError::InvalidId`] for a malformed identifier.
    pub fn register<A, T, F>(&self, id: &str, f: F) -> SpiResult<()>
    where
        A: 'static,
        T: 'static,
        F: Fn(A) -> SpiResult<T> + Send + Sync + 'static,
    {
        let (module, name) = split_id(id)?;
        let typed: Factory<A, T> = Arc::new(f);

        let mut entries = self.factories.entry(module.to_string()).or_default();
        entries.retain(|e| e.name != name);
        entries.push(FactoryEntry {
            name: name.to_string(),
            factory: Arc::new(typed),
        });
        Ok(())
    }

    /// Lists factory names registered for a module.
    #[must_use]
    pub fn names(&self, module: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .factories
            .get(module)
            .map(|entries| entries.iter().map(|e| e.name.clone()).collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Resolves `<module>:<name>` and runs the factory.
    ///
    /// # Errors
    ///
    /// Returns a distinct error for a malformed identifier, a module that is
    /// not installed, a disabled module, an unknown name and a type mismatch.
    /// Errors from the factory itself are passed through.
    pub fn create<A: 'static, T: 'static>(
        &self,
        id: &str,
        args: A,
        modules: &ModuleSet,
    ) -> SpiResult<T> {
        let (module, name) = split_id(id)?;

        if !modules.is_installed(module) {
            return Err(SpiError::ModuleNotInstalled(module.to_string()));
        }
        if !modules.is_enabled(module) {
            return Err(SpiError::ModuleDisabled(module.to_string()));
        }

        let factory = {
            let unknown = || SpiError::UnknownFactory {
                module: module.to_string(),
                name: name.to_string(),
            };
            let entries = self.factories.get(module).ok_or_else(unknown)?;
            let entry = entries.iter().find(|e| e.name == name).ok_or_else(unknown)?;
            entry
                .factory
                .downcast_ref::<Factory<A, T>>()
                .map(Arc::clone)
                .ok_or_else(|| SpiError::TypeMismatch {
                    id: id.to_string(),
                    expected: type_name::<T>(),
                })?
        };

        factory(args)
    }
}
