//! # sp-spi
//!
//! Module system for the SAML service provider.
//!
//! - [`ModuleSet`] - installed modules and memoised enablement
//! - [`HookRegistry`] - typed hooks, run in module-name order
//! - [`FactoryRegistry`] - `<module>:<name>` identifiers resolved to typed factories
//! - [`ModuleRegistry`] - the three combined, as handed to authentication sources

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod factory;
pub mod hooks;
pub mod module;
pub mod registry;

pub use error::{SpiError, SpiResult};
pub use factory::FactoryRegistry;
pub use hooks::HookRegistry;
pub use module::ModuleSet;
pub use registry::ModuleRegistry;
