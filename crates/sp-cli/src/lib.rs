//! # sp-cli
//!
//! CLI tools for SAML SP authentication sources.
//!
//! This crate provides command-line utilities for:
//! - Listing the configured sources
//! - Validating a sources file
//! - Printing hosted metadata as XML or JSON
//! - Building an authentication request against an IdP metadata file

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
