//! Configuration management for the SAML SP.
//!
//! Two layers of configuration exist: the process-wide [`GlobalConfig`] and one
//! [`SpConfig`] per authentication source. Both are plain serde structures; the
//! [`AuthSourcesConfig`] loader reads them from a single TOML file and resolves
//! key material so that the resulting values are immutable afterwards.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Email address that marks the global technical contact as "not applicable".
pub const TECHNICAL_CONTACT_NOT_APPLICABLE: &str = "na@example.org";

/// Process-wide configuration shared by every authentication source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Base URL of this deployment, used to derive endpoint locations.
    pub base_url: String,
    /// Name of the deployment's technical contact.
    pub technical_contact_name: String,
    /// Email of the deployment's technical contact.
    pub technical_contact_email: String,
    /// Explicit module enablement flags.
    pub module_enable: BTreeMap<String, bool>,
    /// Directory that relative key and certificate file names resolve against.
    pub cert_dir: PathBuf,
    /// Default log level.
    pub log_level: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            technical_contact_name: "Administrator".to_string(),
            technical_contact_email: TECHNICAL_CONTACT_NOT_APPLICABLE.to_string(),
            module_enable: BTreeMap::new(),
            cert_dir: PathBuf::from("cert"),
            log_level: "info".to_string(),
        }
    }
}

impl GlobalConfig {
    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Returns the global technical contact, unless it is the "not applicable" sentinel.
    #[must_use]
    pub fn technical_contact(&self) -> Option<(&str, &str)> {
        if self.technical_contact_email == TECHNICAL_CONTACT_NOT_APPLICABLE {
            return None;
        }
        Some((
            self.technical_contact_name.as_str(),
            self.technical_contact_email.as_str(),
        ))
    }
}

/// Static configuration of one SP authentication source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpConfig {
    /// Entity ID of this service provider.
    pub entity_id: String,

    /// Fixed IdP to use for every authentication.
    pub idp: Option<String>,

    /// Static scope list embedded in authentication requests.
    pub idp_list: Vec<String>,

    /// Discovery service URL.
    pub disco_url: Option<String>,

    /// Bindings to synthesize assertion consumer endpoints for.
    pub acs_bindings: Option<Vec<String>>,

    /// Explicit assertion consumer endpoints, used verbatim.
    pub assertion_consumer_service: Option<Vec<AcsEndpointConfig>>,

    /// Protocol binding requested for responses (holder-of-key profile).
    pub protocol_binding: Option<String>,

    /// Single logout bindings. `None` selects the defaults, an empty list disables SLO.
    pub slo_bindings: Option<Vec<String>>,

    /// Location shared by every single logout endpoint.
    pub slo_location: Option<String>,

    /// Contact persons published in metadata.
    pub contacts: Vec<ContactConfig>,

    /// Organization name per language.
    pub organization_name: BTreeMap<String, String>,

    /// Organization display name per language.
    pub organization_display_name: BTreeMap<String, String>,

    /// Organization URL per language.
    pub organization_url: BTreeMap<String, String>,

    /// User interface information.
    pub ui_info: Option<UiInfo>,

    /// Entity attributes, keyed by attribute name.
    pub entity_attributes: BTreeMap<String, Vec<String>>,

    /// Registration information.
    pub registration_info: Option<RegistrationInfo>,

    /// Name ID policy.
    pub name_id_policy: Option<NameIdPolicyConfig>,

    /// Service name per language.
    pub name: BTreeMap<String, String>,

    /// Service description per language.
    pub description: BTreeMap<String, String>,

    /// Requested attributes, friendly name to attribute name.
    pub attributes: BTreeMap<String, String>,

    /// Required attributes, friendly name to attribute name.
    pub attributes_required: BTreeMap<String, String>,

    /// Name format of the requested attributes.
    pub attributes_name_format: Option<String>,

    /// Index of the attribute consuming service.
    pub attributes_index: Option<u32>,

    /// Whether the attribute consuming service is the default one.
    pub attributes_is_default: Option<bool>,

    /// Sign messages sent over the HTTP-Redirect binding.
    pub redirect_sign: Option<bool>,

    /// Sign authentication requests.
    pub sign_authnrequest: Option<bool>,

    /// Require signed assertions.
    pub want_assertions_signed: Option<bool>,

    /// Signature algorithm URI; RSA-SHA256 when unset.
    pub signature_algorithm: Option<String>,

    /// Current key pair.
    pub credentials: Option<KeyPairConfig>,

    /// Rollover key pair, published ahead of the current one.
    pub rollover_credentials: Option<KeyPairConfig>,
}

impl SpConfig {
    /// Creates a configuration with only the entity ID set.
    #[must_use]
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            ..Self::default()
        }
    }

    /// Resolves key material given by file name against `cert_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced file cannot be read.
    pub fn resolve_credentials(&mut self, cert_dir: &Path) -> Result<()> {
        if let Some(keys) = self.credentials.as_mut() {
            keys.resolve(cert_dir)?;
        }
        if let Some(keys) = self.rollover_credentials.as_mut() {
            keys.resolve(cert_dir)?;
        }
        Ok(())
    }
}

/// Explicitly configured assertion consumer endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcsEndpointConfig {
    /// Endpoint index.
    pub index: u32,
    /// Endpoint location.
    pub location: String,
    /// Binding URN.
    pub binding: String,
    /// Whether this is the default endpoint.
    #[serde(default)]
    pub is_default: Option<bool>,
}

/// Configured contact person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Contact type, validated when metadata is generated.
    pub contact_type: String,
    /// Company name.
    pub company: Option<String>,
    /// Given name.
    pub given_name: Option<String>,
    /// Surname.
    pub sur_name: Option<String>,
    /// Email addresses.
    pub email_address: Vec<String>,
    /// Telephone numbers.
    pub telephone_number: Vec<String>,
    /// Namespaced attributes on the contact element.
    pub attributes: Vec<ContactAttribute>,
}

/// Namespaced attribute on a contact person element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactAttribute {
    /// Namespace URI.
    pub namespace_uri: String,
    /// Namespace prefix.
    pub namespace_prefix: String,
    /// Attribute local name.
    pub attr_name: String,
    /// Attribute value.
    pub attr_value: String,
}

/// User interface information, keyed by language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiInfo {
    /// Display name per language.
    pub display_name: BTreeMap<String, String>,
    /// Description per language.
    pub description: BTreeMap<String, String>,
    /// Information URL per language.
    pub information_url: BTreeMap<String, String>,
    /// Privacy statement URL per language.
    pub privacy_statement_url: BTreeMap<String, String>,
    /// Keywords per language.
    pub keywords: BTreeMap<String, Vec<String>>,
    /// Logos.
    pub logo: Vec<UiLogo>,
}

impl UiInfo {
    /// Returns true if nothing is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_name.is_empty()
            && self.description.is_empty()
            && self.information_url.is_empty()
            && self.privacy_statement_url.is_empty()
            && self.keywords.is_empty()
            && self.logo.is_empty()
    }
}

/// Logo entry of the user interface information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiLogo {
    /// Logo URL.
    pub url: String,
    /// Height in pixels.
    pub height: u32,
    /// Width in pixels.
    pub width: u32,
    /// Language of the logo.
    #[serde(default)]
    pub lang: Option<String>,
}

/// Registration information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationInfo {
    /// Registration authority.
    pub authority: String,
    /// Registration instant.
    #[serde(default)]
    pub instant: Option<String>,
    /// Registration policy URL per language.
    #[serde(default)]
    pub policies: BTreeMap<String, String>,
}

/// Name ID policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameIdPolicyConfig {
    /// Requested name ID format.
    #[serde(default)]
    pub format: Option<String>,
    /// Whether the IdP may create a new identifier.
    #[serde(default = "default_allow_create")]
    pub allow_create: bool,
}

impl Default for NameIdPolicyConfig {
    fn default() -> Self {
        Self {
            format: None,
            allow_create: true,
        }
    }
}

const fn default_allow_create() -> bool {
    true
}

/// A private key and its certificate.
///
/// Both values hold PEM text once resolved; in configuration files they may
/// name a file relative to the certificate directory instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPairConfig {
    /// Private key (PEM or file name).
    pub private_key: String,
    /// Certificate (PEM or file name).
    pub certificate: String,
}

impl KeyPairConfig {
    /// Creates a key pair from PEM text.
    #[must_use]
    pub fn from_pem(private_key: impl Into<String>, certificate: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
            certificate: certificate.into(),
        }
    }

    fn resolve(&mut self, cert_dir: &Path) -> Result<()> {
        self.private_key = read_pem_or_file(&self.private_key, cert_dir)?;
        self.certificate = read_pem_or_file(&self.certificate, cert_dir)?;
        Ok(())
    }
}

fn read_pem_or_file(value: &str, cert_dir: &Path) -> Result<String> {
    if value.trim_start().starts_with("-----BEGIN") {
        return Ok(value.to_string());
    }
    let path = cert_dir.join(value);
    std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))
}

/// One configured authentication source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Implementation identifier, `<module>:<name>`.
    #[serde(rename = "type")]
    pub source_type: String,
    /// SP settings.
    #[serde(flatten)]
    pub sp: SpConfig,
}

/// Contents of an authentication sources file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSourcesConfig {
    /// Process-wide settings.
    pub global: GlobalConfig,
    /// Authentication sources keyed by source ID.
    pub sources: BTreeMap<String, SourceConfig>,
}

impl AuthSourcesConfig {
    /// Parses configuration from TOML text without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {e}")))
    }

    /// Loads configuration from a TOML file and resolves key files.
    ///
    /// Relative certificate directories resolve against the directory holding
    /// the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a
    /// referenced key file is missing.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let mut config = Self::from_toml(&content)?;

        let cert_dir = if config.global.cert_dir.is_relative() {
            path.parent()
                .unwrap_or_else(|| Path::new("."))
                .join(&config.global.cert_dir)
        } else {
            config.global.cert_dir.clone()
        };

        for (id, source) in &mut config.sources {
            source.sp.resolve_credentials(&cert_dir).map_err(|e| {
                Error::Config(format!("source '{id}': {e}"))
            })?;
        }

        tracing::debug!(sources = config.sources.len(), path = %path.display(), "Loaded auth sources");
        Ok(config)
    }

    /// Returns a source by ID.
    #[must_use]
    pub fn source(&self, id: &str) -> Option<&SourceConfig> {
        self.sources.get(id)
    }
}
