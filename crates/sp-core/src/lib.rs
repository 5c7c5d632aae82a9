//! # sp-core
//!
//! Core configuration, error handling and event logging for the SAML service
//! provider crates.
//!
//! Every other crate in the workspace depends on this one for the shared
//! [`GlobalConfig`] and [`SpConfig`] structures and for the audit
//! [`event`] vocabulary.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod event;
pub mod logging;

pub use config::{AuthSourcesConfig, GlobalConfig, SourceConfig, SpConfig};
pub use error::{Error, Result};
