//! Typed hooks.
//!
//! A module registers a hook under a name for one data type. Calling a hook
//! runs every registration for that name, in sorted module order, skipping
//! modules that are not enabled.

use std::any::{type_name, Any};
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{SpiError, SpiResult};
use crate::module::ModuleSet;

/// A hook over data of type `T`.
pub type Hook<T> = Arc<dyn Fn(&mut T) -> SpiResult<()> + Send + Sync>;

struct HookEntry {
    module: String,
    hook: Arc<dyn Any + Send + Sync>,
}

/// Registry of hooks keyed by hook name.
#[derive(Default)]
pub struct HookRegistry {
    hooks: DashMap<String, Vec<HookEntry>>,
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hook_names())
            .finish()
    }
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook for `module`, replacing an earlier one with the same name.
    pub fn register<T, F>(&self, module: &str, hook: &str, f: F)
    where
        T: 'static,
        F: Fn(&mut T) -> SpiResult<()> + Send + Sync + 'static,
    {
        let typed: Hook<T> = Arc::new(f);
        let mut entries = self.hooks.entry(hook.to_string()).or_default();
        entries.retain(|e| e.module != module);
        entries.push(HookEntry {
            module: module.to_string(),
            hook: Arc::new(typed),
        });
        tracing::debug!(module, hook, "Hook registered");
    }

    /// Returns the names of all registered hooks.
    #[must_use]
    pub fn hook_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.hooks.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Runs hook `hook` over `data` for every enabled module.
    ///
    /// Returns the number of hooks that ran.
    ///
    /// # Errors
    ///
    /// Returns [`SpiError::TypeMismatch`] if a registration expects another
    /// data type, or [`SpiError::HookFailed`] for the first failing hook.
    pub fn call<T: 'static>(&self, hook: &str, data: &mut T, modules: &ModuleSet) -> SpiResult<usize> {
        let mut selected: Vec<(String, Hook<T>)> = match self.hooks.get(hook) {
            Some(entries) => entries
                .iter()
                .map(|e| {
                    e.hook
                        .downcast_ref::<Hook<T>>()
                        .map(|f| (e.module.clone(), Arc::clone(f)))
                        .ok_or_else(|| SpiError::TypeMismatch {
                            id: format!("{}:{hook}", e.module),
                            expected: type_name::<T>(),
                        })
                })
                .collect::<SpiResult<_>>()?,
            None => return Ok(0),
        };
        selected.sort_by(|a, b| a.0.cmp(&b.0));

        let mut ran = 0;
        for (module, f) in selected {
            if !modules.is_enabled(&module) {
                continue;
            }
            f(data).map_err(|e| match e {
                SpiError::HookFailed { .. } => e,
                other => SpiError::HookFailed {
                    module: module.clone(),
                    hook: hook.to_string(),
                    message: other.to_string(),
                },
            })?;
            ran += 1;
        }

        tracing::trace!(hook, ran, "Hooks called");
        Ok(ran)
    }
}
