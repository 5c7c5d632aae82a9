//! End-to-end integration tests.
//!
//! Sources are loaded from `fixtures/authsources.toml` and created through
//! the module registry, the way a deployment creates them.

mod common;
mod endpoints;
mod flows;
mod metadata;
