//! Authentication flows through sources created by the module registry.

use sp_crypto::{rsa_verify, RsaAlgorithm};
use sp_protocol_saml::bindings::HttpRedirectBinding;
use sp_protocol_saml::types::{HOLDER_OF_KEY_SSO, Extension, NameId};
use sp_protocol_saml::{AuthnOutcome, LogoutState, RuntimeState, SamlError};

use crate::common::{TestEnv, IDP1, IDP2, SP_PUBLIC_KEY, SURF};

#[test]
fn runtime_list_with_one_known_idp_sends_signed_request() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let state = RuntimeState::new()
        .with_idp_list(["noSuchIdp", SURF])
        .with_relay_state("https://sp.example.org/app");

    let AuthnOutcome::Request(message) = env.source("default-sp").authenticate(state)? else {
        anyhow::bail!("expected a request");
    };

    assert_eq!(message.destination, format!("{SURF}/sso"));
    assert!(message.redirect_url.starts_with(&format!("{SURF}/sso?SAMLRequest=")));

    let decoded = HttpRedirectBinding::decode_url(&message.redirect_url)?;
    assert_eq!(decoded.relay_state.as_deref(), Some("https://sp.example.org/app"));
    assert!(decoded.xml.contains(r#"<samlp:IDPEntry ProviderID="noSuchIdp"/>"#));
    assert!(decoded.xml.contains(&format!(r#"<samlp:IDPEntry ProviderID="{SURF}"/>"#)));
    assert!(!decoded.xml.contains("<ds:Signature"));

    let signature = base64_decode(decoded.signature.as_deref().unwrap_or_default())?;
    let signed = HttpRedirectBinding::signed_query(&message.redirect_url)?;
    assert!(rsa_verify(SP_PUBLIC_KEY, signed.as_bytes(), &signature, RsaAlgorithm::Rs256));
    Ok(())
}

#[test]
fn unsigned_source_sends_plain_redirect() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let message = env
        .source("scoped-sp")
        .start_sso(IDP1, &RuntimeState::new())?;

    assert!(!message.redirect_url.contains("Signature="));
    assert!(!message.xml.contains("<ds:Signature"));
    Ok(())
}

#[test]
fn unknown_candidates_fail_with_no_supported_idp() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let err = env
        .source("default-sp")
        .authenticate(RuntimeState::new().with_idp_list(["urn:unknown:a", "urn:unknown:b"]))
        .unwrap_err();

    assert!(matches!(err, SamlError::NoSupportedIdp { .. }));
    assert_eq!(
        err.sub_status_code(),
        Some("urn:oasis:names:tc:SAML:2.0:status:NoSupportedIDP")
    );
    Ok(())
}

#[test]
fn fixed_idp_outside_runtime_candidates_is_unavailable() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let err = env
        .source("fixed-sp")
        .authenticate(RuntimeState::new().with_idp_list([IDP2]))
        .unwrap_err();

    let SamlError::NoAvailableIdp { idp, candidates } = err else {
        anyhow::bail!("expected NoAvailableIdp, got {err}");
    };
    assert_eq!(idp, IDP1);
    assert_eq!(candidates, [IDP2]);
    Ok(())
}

#[test]
fn fixed_idp_request_carries_config_scope_and_holder_of_key() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let AuthnOutcome::Request(message) = env.source("fixed-sp").authenticate(RuntimeState::new())? else {
        anyhow::bail!("expected a request");
    };

    assert_eq!(message.destination, format!("{IDP1}/sso"));
    assert!(message.xml.contains(&format!(r#"ProviderID="{IDP2}""#)));
    assert!(message.xml.contains(&format!(r#"ProtocolBinding="{HOLDER_OF_KEY_SSO}""#)));
    Ok(())
}

#[test]
fn config_scope_goes_through_discovery() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let source = env.source("scoped-sp");

    let AuthnOutcome::Discovery(redirect) = source.authenticate(RuntimeState::new())? else {
        anyhow::bail!("expected discovery");
    };
    assert_eq!(redirect.candidates, [IDP1, IDP2]);

    let url = url::Url::parse(&redirect.url)?;
    let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(params.contains(&("entityID".to_string(), "https://sp.example.org/scoped".to_string())));
    assert!(params.contains(&("returnIDParam".to_string(), "idpentityid".to_string())));
    assert_eq!(params.iter().filter(|(k, _)| k == "IDPList[]").count(), 2);

    let message = source.resume_discovery(&redirect.state_id, IDP2)?;
    assert_eq!(message.destination, format!("{IDP2}/sso"));
    Ok(())
}

#[test]
fn logout_request_is_signed_and_carries_extensions() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let logout = LogoutState::new(IDP1, NameId::new("user-1").with_sp_name_qualifier("https://sp.example.org/sp"))
        .with_session_index("_session1")
        .with_extension(Extension::parse(r#"<ext:Hint xmlns:ext="urn:example:ext">soft</ext:Hint>"#)?);

    let message = env.source("default-sp").logout(&logout)?;

    assert_eq!(message.destination, format!("{IDP1}/slo"));
    assert!(message.xml.contains("<ds:Signature"));
    assert!(message.xml.contains("<samlp:SessionIndex>_session1</samlp:SessionIndex>"));
    assert!(message.xml.contains(r#"<ext:Hint xmlns:ext="urn:example:ext">soft</ext:Hint>"#));
    Ok(())
}

fn base64_decode(value: &str) -> anyhow::Result<Vec<u8>> {
    use base64::Engine;
    Ok(base64::engine::general_purpose::STANDARD.decode(value)?)
}
