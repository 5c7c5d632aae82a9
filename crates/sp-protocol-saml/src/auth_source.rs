//! The `saml:SP` authentication source.
//!
//! [`SpAuthSource`] ties the pieces together for one configured service
//! provider: it resolves the scoping list, decides where the user goes,
//! builds and signs the outgoing messages and produces the hosted metadata.

use std::collections::BTreeMap;
use std::sync::Arc;

use sp_core::event::{AuthEvent, AuthEventBuilder, AuthEventType};
use sp_core::{AuthSourcesConfig, GlobalConfig, SpConfig};
use sp_spi::{ModuleRegistry, SpiError, SpiResult};

use crate::bindings::{discovery_url, DiscoveryRedirect};
use crate::decision::{decide, Destination};
use crate::error::{SamlError, SamlResult};
use crate::location::SpLocations;
use crate::lookup::MetadataLookup;
use crate::message::{MessageBuilder, RequestSettings, SignedMessage};
use crate::metadata::{acs_endpoints, synthesize, validate_entity_id, MetadataDocument};
use crate::scope::{resolve_scope, ScopeList};
use crate::signature::{MessageSigner, SignatureAlgorithm, Unsigned, XmlSigner};
use crate::state::{InMemoryStateStore, RuntimeState, StateStore};
use crate::types::{Extension, NameId, NameIdPolicy, SAML2_PROTOCOL};

/// Source type identifier of the SAML service provider.
pub const SP_SOURCE_TYPE: &str = "saml:SP";

/// Hook run over every synthesized metadata document.
pub const METADATA_HOSTED_HOOK: &str = "metadata_hosted";

/// Result of starting an authentication.
#[derive(Debug, Clone)]
pub enum AuthnOutcome {
    /// Send this request to the chosen IdP.
    Request(SignedMessage),
    /// Send the user to a discovery service first.
    Discovery(DiscoveryRedirect),
}

/// Parameters of a logout.
#[derive(Debug, Clone)]
pub struct LogoutState {
    /// IdP holding the session.
    pub idp: String,
    /// Subject of the session.
    pub name_id: NameId,
    /// Session index issued by the IdP.
    pub session_index: Option<String>,
    /// Extension elements for the request.
    pub extensions: Vec<Extension>,
    /// Opaque value echoed back by the IdP.
    pub relay_state: Option<String>,
}

impl LogoutState {
    /// Creates logout parameters for `name_id` at `idp`.
    #[must_use]
    pub fn new(idp: impl Into<String>, name_id: NameId) -> Self {
        Self {
            idp: idp.into(),
            name_id,
            session_index: None,
            extensions: Vec::new(),
            relay_state: None,
        }
    }

    /// Sets the session index.
    #[must_use]
    pub fn with_session_index(mut self, index: impl Into<String>) -> Self {
        self.session_index = Some(index.into());
        self
    }

    /// Adds an extension element.
    #[must_use]
    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extensions.push(extension);
        self
    }
}

/// Arguments handed to the `saml:SP` factory.
#[derive(Clone)]
pub struct SourceArgs {
    /// Source identifier.
    pub source_id: String,
    /// Source configuration.
    pub config: SpConfig,
    /// Process-wide configuration.
    pub global: Arc<GlobalConfig>,
    /// Trusted IdP metadata.
    pub metadata: Arc<dyn MetadataLookup>,
    /// Module registry for hooks.
    pub modules: Option<Arc<ModuleRegistry>>,
}

/// A configured SAML service provider.
pub struct SpAuthSource {
    source_id: String,
    config: SpConfig,
    global: Arc<GlobalConfig>,
    locations: SpLocations,
    metadata: Arc<dyn MetadataLookup>,
    signer: Arc<dyn MessageSigner>,
    states: Arc<dyn StateStore>,
    modules: Option<Arc<ModuleRegistry>>,
    settings: RequestSettings,
}

impl std::fmt::Debug for SpAuthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpAuthSource")
            .field("source_id", &self.source_id)
            .field("entity_id", &self.config.entity_id)
            .finish_non_exhaustive()
    }
}

impl SpAuthSource {
    /// Creates the source.
    ///
    /// Messages are signed with the configured key pair, or left unsigned
    /// when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing or sample entity ID and for unusable key material.
    pub fn new(
        source_id: impl Into<String>,
        config: SpConfig,
        global: Arc<GlobalConfig>,
        metadata: Arc<dyn MetadataLookup>,
    ) -> SamlResult<Self> {
        let source_id = source_id.into();
        validate_entity_id(&config.entity_id)?;

        let signer: Arc<dyn MessageSigner> = match &config.credentials {
            Some(key_pair) => {
                let algorithm = match config.signature_algorithm.as_deref() {
                    Some(uri) => SignatureAlgorithm::from_uri(uri).ok_or_else(|| {
                        SamlError::Validation(format!("Unsupported signature algorithm: {uri}"))
                    })?,
                    None => SignatureAlgorithm::default(),
                };
                Arc::new(XmlSigner::from_key_pair(key_pair)?.with_algorithm(algorithm))
            }
            None => {
                tracing::warn!(source = %source_id, "no key pair configured, messages will be unsigned");
                Arc::new(Unsigned)
            }
        };

        let locations = SpLocations::new(global.base_url(), source_id.clone());
        let first_acs = acs_endpoints(&config, &locations).into_iter().next();
        let settings = RequestSettings {
            acs_url: first_acs.as_ref().map(|e| e.location.clone()),
            protocol_binding: config
                .protocol_binding
                .clone()
                .or_else(|| first_acs.map(|e| e.binding)),
            name_id_policy: Some(
                config
                    .name_id_policy
                    .as_ref()
                    .map(NameIdPolicy::from)
                    .unwrap_or_default(),
            ),
        };

        tracing::debug!(source = %source_id, entity_id = %config.entity_id, "SP source created");
        Ok(Self {
            source_id,
            config,
            global,
            locations,
            metadata,
            signer,
            states: Arc::new(InMemoryStateStore::default()),
            modules: None,
            settings,
        })
    }

    /// Replaces the message signer.
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn MessageSigner>) -> Self {
        self.signer = signer;
        self
    }

    /// Replaces the state store.
    #[must_use]
    pub fn with_state_store(mut self, states: Arc<dyn StateStore>) -> Self {
        self.states = states;
        self
    }

    /// Runs module hooks from `modules`.
    #[must_use]
    pub fn with_modules(mut self, modules: Arc<ModuleRegistry>) -> Self {
        self.modules = Some(modules);
        self
    }

    /// Source identifier.
    #[must_use]
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Entity ID of this SP.
    #[must_use]
    pub fn entity_id(&self) -> &str {
        &self.config.entity_id
    }

    /// Source configuration.
    #[must_use]
    pub const fn config(&self) -> &SpConfig {
        &self.config
    }

    /// URL layout of this SP.
    #[must_use]
    pub const fn locations(&self) -> &SpLocations {
        &self.locations
    }

    /// Protocols this source speaks.
    #[must_use]
    pub fn supported_protocols(&self) -> Vec<&'static str> {
        vec![SAML2_PROTOCOL]
    }

    fn event(&self, event_type: AuthEventType) -> AuthEventBuilder {
        AuthEvent::builder(event_type).source(self.source_id.as_str())
    }

    /// Starts an authentication.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::NoSupportedIdp`] or [`SamlError::NoAvailableIdp`]
    /// when the candidates rule out every IdP, and any error from building
    /// the request or the discovery redirect.
    pub fn authenticate(&self, state: RuntimeState) -> SamlResult<AuthnOutcome> {
        let fixed_idp = state.idp.clone().or_else(|| self.config.idp.clone());
        let sp_candidates: &[String] = if fixed_idp.is_none() {
            &self.config.idp_list
        } else {
            &[]
        };
        let candidates = resolve_scope(&state.idp_list, sp_candidates, &[]);

        match decide(&candidates, fixed_idp.as_deref(), self.metadata.as_ref()) {
            Ok(Destination::Proceed(idp)) => self.start_sso(&idp, &state).map(AuthnOutcome::Request),
            Ok(Destination::Redirect(candidates)) => {
                self.start_discovery(candidates, state).map(AuthnOutcome::Discovery)
            }
            Err(err) => {
                let event_type = match &err {
                    SamlError::NoAvailableIdp { .. } => AuthEventType::NoAvailableIdp,
                    _ => AuthEventType::NoSupportedIdp,
                };
                self.event(event_type)
                    .failure(err.to_string())
                    .detail("candidates", candidates.as_slice().join(" "))
                    .emit();
                Err(err)
            }
        }
    }

    /// Builds the authentication request for `idp`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown IdP, a missing SSO endpoint or a signing failure.
    pub fn start_sso(&self, idp: &str, state: &RuntimeState) -> SamlResult<SignedMessage> {
        let idp_metadata = self.metadata.get(idp)?;
        let scope = resolve_scope(&state.idp_list, &self.config.idp_list, &idp_metadata.idp_list);

        let message = MessageBuilder::new(&self.config.entity_id, self.signer.as_ref(), &self.settings)
            .authn_request(&idp_metadata, state, &scope)?;

        self.event(AuthEventType::AuthnRequestSent)
            .detail("idp", idp)
            .detail("request_id", message.id.as_str())
            .emit();
        Ok(message)
    }

    /// Parks `state` and builds the discovery service redirect.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::InvalidUrl`] for a discovery URL that is not HTTP(S).
    pub fn start_discovery(&self, candidates: Vec<String>, state: RuntimeState) -> SamlResult<DiscoveryRedirect> {
        let disco = self
            .config
            .disco_url
            .clone()
            .unwrap_or_else(|| self.locations.discovery());
        let state_id = self.states.save(state)?;

        let url = discovery_url(
            &disco,
            &self.config.entity_id,
            &self.locations.discovery_response(&state_id),
            &candidates,
        )
        .inspect_err(|err| {
            self.event(AuthEventType::DiscoveryRedirect)
                .failure(err.to_string())
                .emit();
        })?;

        self.event(AuthEventType::DiscoveryRedirect)
            .detail("candidates", candidates.len().to_string())
            .emit();
        Ok(DiscoveryRedirect {
            url,
            state_id,
            candidates,
        })
    }

    /// Continues a parked authentication with the IdP the user picked.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::StateNotFound`] for an unknown state and any
    /// error from [`Self::start_sso`].
    pub fn resume_discovery(&self, state_id: &str, idp: &str) -> SamlResult<SignedMessage> {
        let mut state = self.states.take(state_id)?;
        self.event(AuthEventType::DiscoveryResponse)
            .detail("idp", idp)
            .emit();
        state.idp = Some(idp.to_string());
        self.start_sso(idp, &state)
    }

    /// Builds the logout request for a session.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown IdP, a missing SLO endpoint or a signing failure.
    pub fn logout(&self, logout: &LogoutState) -> SamlResult<SignedMessage> {
        let idp_metadata = self.metadata.get(&logout.idp)?;
        let message = MessageBuilder::new(&self.config.entity_id, self.signer.as_ref(), &self.settings)
            .logout_request(
                &idp_metadata,
                &logout.name_id,
                logout.session_index.as_deref(),
                &logout.extensions,
                logout.relay_state.clone(),
            )?;

        self.event(AuthEventType::LogoutRequestSent)
            .detail("idp", logout.idp.as_str())
            .emit();
        Ok(message)
    }

    /// Synthesizes this SP's metadata and runs the `metadata_hosted` hook over it.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad configuration or a failing hook.
    pub fn hosted_metadata(&self) -> SamlResult<MetadataDocument> {
        let mut document = synthesize(&self.config, &self.source_id, &self.global)?;
        if let Some(modules) = &self.modules {
            modules.call_hooks(METADATA_HOSTED_HOOK, &mut document)?;
        }
        self.event(AuthEventType::MetadataGenerated).emit();
        Ok(document)
    }
}

/// Registers the `saml:SP` source factory.
///
/// # Errors
///
/// Fails only if the identifier is malformed.
pub fn register(registry: &ModuleRegistry) -> SpiResult<()> {
    registry.register_factory(SP_SOURCE_TYPE, |args: SourceArgs| -> SpiResult<Arc<SpAuthSource>> {
        let modules = args.modules.clone();
        let source = SpAuthSource::new(args.source_id, args.config, args.global, args.metadata)
            .map_err(|e| SpiError::CreationFailed(e.to_string()))?;
        Ok(Arc::new(match modules {
            Some(modules) => source.with_modules(modules),
            None => source,
        }))
    })
}

/// Creates every configured source through the module registry.
///
/// # Errors
///
/// Returns the first source that cannot be created.
pub fn load_sources(
    config: &AuthSourcesConfig,
    metadata: &Arc<dyn MetadataLookup>,
    registry: &Arc<ModuleRegistry>,
) -> SamlResult<BTreeMap<String, Arc<SpAuthSource>>> {
    let global = Arc::new(config.global.clone());
    config
        .sources
        .iter()
        .map(|(id, source)| -> SamlResult<(String, Arc<SpAuthSource>)> {
            let args = SourceArgs {
                source_id: id.clone(),
                config: source.sp.clone(),
                global: Arc::clone(&global),
                metadata: Arc::clone(metadata),
                modules: Some(Arc::clone(registry)),
            };
            let created = registry.create::<SourceArgs, Arc<SpAuthSource>>(&source.source_type, args)?;
            Ok((id.clone(), created))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::HttpRedirectBinding;
    use crate::lookup::InMemoryMetadataStore;
    use crate::types::{IdpMetadata, SamlBinding};
    use sp_core::config::KeyPairConfig;

    const KEY: &str = include_str!("../../sp-crypto/testdata/sp.key");
    const CERT: &str = include_str!("../../sp-crypto/testdata/sp.crt");
    const SURF: &str = "https://engine.surfconext.nl/authentication/idp/metadata";

    fn idp(entity_id: &str) -> IdpMetadata {
        IdpMetadata::new(entity_id)
            .with_sso(SamlBinding::HttpRedirect, format!("{entity_id}/sso"))
            .with_slo(SamlBinding::HttpRedirect, format!("{entity_id}/slo"))
    }

    fn lookup() -> Arc<dyn MetadataLookup> {
        Arc::new(
            [idp(SURF), idp("https://idp1.example.org"), idp("https://idp2.example.org")]
                .into_iter()
                .collect::<InMemoryMetadataStore>(),
        )
    }

    fn global() -> Arc<GlobalConfig> {
        Arc::new(GlobalConfig {
            base_url: "https://sp.example.org".to_string(),
            ..GlobalConfig::default()
        })
    }

    fn source(config: SpConfig) -> SpAuthSource {
        SpAuthSource::new("default-sp", config, global(), lookup()).unwrap()
    }

    fn config() -> SpConfig {
        let mut config = SpConfig::new("urn:x-simplesamlphp:example-sp");
        config.credentials = Some(KeyPairConfig::from_pem(KEY, CERT));
        config
    }

    #[test]
    fn placeholder_entity_id_is_rejected() {
        let err = SpAuthSource::new("sp", SpConfig::new("https://myapp.example.org/"), global(), lookup())
            .unwrap_err();
        assert!(err.to_string().contains("entityID"));
    }

    #[test]
    fn unknown_runtime_idp_list_fails() {
        let err = source(config())
            .authenticate(RuntimeState::new().with_idp_list(["noSuchIdp"]))
            .unwrap_err();
        assert!(matches!(err, SamlError::NoSupportedIdp { .. }));
    }

    #[test]
    fn fixed_idp_outside_runtime_list_fails() {
        let mut config = config();
        config.idp = Some("https://idp1.example.org".to_string());
        let err = source(config)
            .authenticate(RuntimeState::new().with_idp_list([SURF]))
            .unwrap_err();
        assert!(matches!(err, SamlError::NoAvailableIdp { .. }));
    }

    #[test]
    fn single_known_candidate_gets_the_request() {
        let outcome = source(config())
            .authenticate(RuntimeState::new().with_idp_list(["noSuchIdp", SURF]))
            .unwrap();
        let AuthnOutcome::Request(message) = outcome else {
            panic!("expected a request");
        };
        assert_eq!(message.destination, format!("{SURF}/sso"));
        assert!(message.xml.contains("<samlp:IDPEntry ProviderID=\"noSuchIdp\"/>"));
        assert!(message.xml.contains("<ds:Signature"));
    }

    #[test]
    fn fixed_idp_proceeds_with_config_hint() {
        let mut config = config();
        config.idp = Some("https://idp1.example.org".to_string());
        config.idp_list = vec!["https://idp2.example.org".to_string()];
        let AuthnOutcome::Request(message) = source(config).authenticate(RuntimeState::new()).unwrap() else {
            panic!("expected a request");
        };
        assert_eq!(message.destination, "https://idp1.example.org/sso");
        assert!(message.xml.contains("ProviderID=\"https://idp2.example.org\""));
    }

    #[test]
    fn idp_metadata_hint_is_last_resort() {
        let store = InMemoryMetadataStore::new();
        store.insert(idp("https://idp1.example.org").with_idp_list(["https://proxied.example.org"]));
        let mut config = config();
        config.idp = Some("https://idp1.example.org".to_string());
        let source = SpAuthSource::new("default-sp", config, global(), Arc::new(store)).unwrap();

        let message = source.start_sso("https://idp1.example.org", &RuntimeState::new()).unwrap();
        assert!(message.xml.contains("ProviderID=\"https://proxied.example.org\""));
    }

    #[test]
    fn several_candidates_go_to_discovery_and_back() {
        let source = source(config());
        let state = RuntimeState::new()
            .with_idp_list(["https://idp1.example.org", "https://idp2.example.org"])
            .with_relay_state("/home");

        let AuthnOutcome::Discovery(redirect) = source.authenticate(state).unwrap() else {
            panic!("expected discovery");
        };
        assert!(redirect.url.starts_with("https://sp.example.org/saml/disco?entityID="));
        assert_eq!(redirect.candidates.len(), 2);

        let message = source
            .resume_discovery(&redirect.state_id, "https://idp2.example.org")
            .unwrap();
        assert_eq!(message.destination, "https://idp2.example.org/sso");
        assert_eq!(message.relay_state.as_deref(), Some("/home"));
        assert!(matches!(
            source.resume_discovery(&redirect.state_id, "https://idp2.example.org"),
            Err(SamlError::StateNotFound(_))
        ));
    }

    #[test]
    fn invalid_discovery_url_fails() {
        let mut config = config();
        config.disco_url = Some("smtp://invalidurl".to_string());
        let err = source(config)
            .authenticate(RuntimeState::new().with_idp_list(["https://idp1.example.org", "https://idp2.example.org"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid URL: smtp://invalidurl");
    }

    #[test]
    fn no_idp_at_all_goes_to_open_discovery() {
        let AuthnOutcome::Discovery(redirect) = source(config()).authenticate(RuntimeState::new()).unwrap() else {
            panic!("expected discovery");
        };
        assert!(redirect.candidates.is_empty());
        assert!(!redirect.url.contains("IDPList"));
    }

    #[test]
    fn configured_signature_algorithm_is_used() {
        let mut config = config();
        config.signature_algorithm = Some(SignatureAlgorithm::RsaSha512.uri().to_string());
        let message = source(config)
            .start_sso("https://idp1.example.org", &RuntimeState::new())
            .unwrap();
        assert!(message.xml.contains(&format!(
            "<ds:SignatureMethod Algorithm=\"{}\"",
            SignatureAlgorithm::RsaSha512.uri()
        )));
        let decoded = HttpRedirectBinding::decode_url(&message.redirect_url).unwrap();
        assert_eq!(decoded.sig_alg.as_deref(), Some(SignatureAlgorithm::RsaSha512.uri()));
    }

    #[test]
    fn unknown_signature_algorithm_is_rejected() {
        let mut config = config();
        config.signature_algorithm = Some("http://www.w3.org/2000/09/xmldsig#rsa-sha1".to_string());
        let err = SpAuthSource::new("sp", config, global(), lookup()).unwrap_err();
        assert!(matches!(err, SamlError::Validation(_)));
    }

    #[test]
    fn abandoned_discovery_does_not_pile_up_state() {
        let states = Arc::new(InMemoryStateStore::new(chrono::Duration::seconds(-1)));
        let source = source(config()).with_state_store(states.clone());
        for _ in 0..1000 {
            let outcome = source.authenticate(RuntimeState::new()).unwrap();
            assert!(matches!(outcome, AuthnOutcome::Discovery(_)));
        }
        assert!(states.len() <= 1);
    }

    #[test]
    fn request_uses_first_acs_endpoint() {
        let message = source(config())
            .start_sso("https://idp1.example.org", &RuntimeState::new())
            .unwrap();
        assert!(message
            .xml
            .contains("AssertionConsumerServiceURL=\"https://sp.example.org/saml/sp/acs/default-sp\""));
        assert!(message.xml.contains(&format!("ProtocolBinding=\"{}\"", SamlBinding::HttpPost.uri())));
        assert!(message.xml.contains("nameid-format:transient"));
    }

    #[test]
    fn logout_request() {
        let ext = Extension::parse(r#"<MyLogoutExtension xmlns="urn:some:namespace"/>"#).unwrap();
        let logout = LogoutState::new("https://idp1.example.org", NameId::new("value1"))
            .with_session_index("_s1")
            .with_extension(ext);
        let message = source(config()).logout(&logout).unwrap();

        assert_eq!(message.destination, "https://idp1.example.org/slo");
        let decoded = HttpRedirectBinding::decode_url(&message.redirect_url).unwrap();
        assert!(decoded.xml.contains("<samlp:Extensions><MyLogoutExtension"));
        assert!(decoded.xml.contains(">value1</saml:NameID>"));
    }

    #[test]
    fn unknown_idp_for_sso() {
        let err = source(config())
            .start_sso("https://nobody.example.org", &RuntimeState::new())
            .unwrap_err();
        assert!(matches!(err, SamlError::UnknownIdentityProvider(_)));
    }

    #[test]
    fn metadata_hook_runs_for_enabled_modules() {
        let registry = Arc::new(ModuleRegistry::default());
        registry.register_hook::<MetadataDocument, _>("saml", METADATA_HOSTED_HOOK, |md| {
            md.entity_attributes
                .insert("http://macedir.org/entity-category".to_string(), vec!["hooked".to_string()]);
            Ok(())
        });
        let source = source(config()).with_modules(registry);

        let md = source.hosted_metadata().unwrap();
        assert_eq!(md.entity_attributes["http://macedir.org/entity-category"], ["hooked"]);
        assert_eq!(source.supported_protocols(), [SAML2_PROTOCOL]);
    }

    #[test]
    fn factory_creates_sources() {
        let registry = Arc::new(ModuleRegistry::default());
        register(&registry).unwrap();

        let config = AuthSourcesConfig::from_toml(
            r#"
            [global]
            base_url = "https://sp.example.org"

            [sources.default-sp]
            type = "saml:SP"
            entity_id = "https://sp.example.org/sp"
            "#,
        )
        .unwrap();
        let sources = load_sources(&config, &lookup(), &registry).unwrap();
        assert_eq!(sources["default-sp"].entity_id(), "https://sp.example.org/sp");

        let bad = AuthSourcesConfig::from_toml(
            r#"
            [sources.x]
            type = "saml:IdP"
            entity_id = "https://sp.example.org/sp"
            "#,
        )
        .unwrap();
        assert!(matches!(
            load_sources(&bad, &lookup(), &registry),
            Err(SamlError::Module(SpiError::UnknownFactory { .. }))
        ));
    }
}
