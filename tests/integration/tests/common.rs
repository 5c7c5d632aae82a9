//! Common test utilities and fixtures.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use sp_core::AuthSourcesConfig;
use sp_protocol_saml::auth_source::{load_sources, register};
use sp_protocol_saml::endpoints::{sp_router, SpState};
use sp_protocol_saml::{IdpMetadata, InMemoryMetadataStore, MetadataLookup, SamlBinding, SpAuthSource};
use sp_spi::ModuleRegistry;

/// IdPs known to every test environment.
pub const IDP1: &str = "https://idp1.example.org";
pub const IDP2: &str = "https://idp2.example.org";
pub const SURF: &str = "https://engine.surfconext.nl/authentication/idp/metadata";

/// Loaded sources over an in-memory IdP store.
pub struct TestEnv {
    pub registry: Arc<ModuleRegistry>,
    pub sources: BTreeMap<String, Arc<SpAuthSource>>,
}

impl TestEnv {
    /// Loads the fixture sources.
    pub fn new() -> anyhow::Result<Self> {
        let _ = sp_core::logging::init("debug");

        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/authsources.toml");
        let config = AuthSourcesConfig::load(&path)?;

        let registry = Arc::new(ModuleRegistry::new(config.global.module_enable.clone()));
        register(&registry)?;
        let sources = load_sources(&config, &idps(), &registry)?;
        Ok(Self { registry, sources })
    }

    /// Returns a source by ID.
    pub fn source(&self, id: &str) -> Arc<SpAuthSource> {
        Arc::clone(&self.sources[id])
    }

    /// Router over the loaded sources.
    pub fn router(&self) -> Router {
        sp_router().with_state(SpState::new(self.sources.clone()))
    }
}

/// The trusted IdPs.
pub fn idps() -> Arc<dyn MetadataLookup> {
    let store: InMemoryMetadataStore = [IDP1, IDP2, SURF]
        .into_iter()
        .map(|id| {
            IdpMetadata::new(id)
                .with_sso(SamlBinding::HttpPost, format!("{id}/sso/post"))
                .with_sso(SamlBinding::HttpRedirect, format!("{id}/sso"))
                .with_slo(SamlBinding::HttpRedirect, format!("{id}/slo"))
        })
        .collect();
    Arc::new(store)
}

/// Public half of the current signing key.
pub const SP_PUBLIC_KEY: &[u8] = include_bytes!("../../../crates/sp-crypto/testdata/sp.rsapub.der");
