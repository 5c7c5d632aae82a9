//! End-to-end tests for the SAML SP workspace.
//!
//! The tests live under `tests/`; this library target is intentionally empty.
