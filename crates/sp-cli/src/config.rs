//! CLI configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sp_core::AuthSourcesConfig;
use sp_protocol_saml::auth_source::{load_sources, register};
use sp_protocol_saml::{IdpMetadata, InMemoryMetadataStore, MetadataLookup, SpAuthSource};
use sp_spi::ModuleRegistry;

use crate::error::{CliError, CliResult};

/// Loaded sources file plus output preferences.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Where the sources were loaded from.
    pub path: PathBuf,
    /// Parsed sources file.
    pub sources: AuthSourcesConfig,
    /// Output format.
    pub output_format: OutputFormat,
}

impl CliConfig {
    /// Loads the sources file.
    pub fn load(path: &Path, output_format: OutputFormat) -> CliResult<Self> {
        let sources = AuthSourcesConfig::load(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            sources,
            output_format,
        })
    }

    /// Creates every source through a fresh module registry.
    pub fn build_sources(
        &self,
        metadata: Arc<dyn MetadataLookup>,
    ) -> CliResult<BTreeMap<String, Arc<SpAuthSource>>> {
        let registry = Arc::new(ModuleRegistry::new(self.sources.global.module_enable.clone()));
        register(&registry)?;
        Ok(load_sources(&self.sources, &metadata, &registry)?)
    }

    /// Creates one source.
    pub fn build_source(&self, source_id: &str, metadata: Arc<dyn MetadataLookup>) -> CliResult<Arc<SpAuthSource>> {
        self.build_sources(metadata)?
            .remove(source_id)
            .ok_or_else(|| CliError::NotFound {
                resource_type: "source".to_string(),
                id: source_id.to_string(),
            })
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
    /// Quiet (minimal output).
    Quiet,
}

/// A file of trusted IdP metadata.
#[derive(Debug, Default, Deserialize)]
pub struct IdpMetadataFile {
    /// Trusted IdPs.
    #[serde(default)]
    pub idps: Vec<IdpMetadata>,
}

impl IdpMetadataFile {
    /// Parses TOML, or JSON for a `.json` file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            toml::from_str(&content)
                .map_err(|e| CliError::Config(format!("failed to parse {}: {e}", path.display())))
        }
    }

    /// Builds a lookup over the listed IdPs.
    #[must_use]
    pub fn into_store(self) -> InMemoryMetadataStore {
        self.idps.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idp_file_from_toml() {
        let file: IdpMetadataFile = toml::from_str(
            r#"
            [[idps]]
            entity_id = "https://idp1.example.org"
            idp_list = ["https://proxied.example.org"]

            [[idps.single_sign_on_services]]
            binding = "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect"
            location = "https://idp1.example.org/sso"
            "#,
        )
        .unwrap();

        let store = file.into_store();
        let idp = store.get("https://idp1.example.org").unwrap();
        assert_eq!(idp.sso_location().unwrap(), "https://idp1.example.org/sso");
        assert_eq!(idp.idp_list, ["https://proxied.example.org"]);
    }
}
