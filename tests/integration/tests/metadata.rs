//! Hosted metadata of the fixture sources.

use std::sync::Arc;

use sp_protocol_saml::metadata::MetadataDocument;
use sp_protocol_saml::types::SamlBinding;

use crate::common::TestEnv;

#[test]
fn rollover_key_is_published_first() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let md = env.source("default-sp").hosted_metadata()?;

    let prefixes: Vec<_> = md.keys.iter().map(|k| (k.prefix, k.signing, k.encryption)).collect();
    assert_eq!(prefixes, [("new_", true, true), ("", true, false)]);
    Ok(())
}

#[test]
fn document_carries_contacts_and_consent() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let md = env.source("default-sp").hosted_metadata()?;

    assert_eq!(md.contacts.len(), 2);
    assert_eq!(md.contacts[0].email_addresses, ["mailto:help@example.org"]);
    assert_eq!(md.contacts[1].email_addresses, ["mailto:ops@example.org"]);

    let service = md.attribute_consuming_service.as_ref().expect("consent service");
    assert_eq!(service.attributes.len(), 2);
    assert_eq!(service.attributes_required.len(), 1);

    let acs: Vec<_> = md
        .assertion_consumer_services
        .iter()
        .map(|e| (e.index, e.binding.as_str()))
        .collect();
    assert_eq!(
        acs,
        [(0, SamlBinding::HttpPost.uri()), (1, SamlBinding::HttpArtifact.uri())]
    );
    Ok(())
}

#[test]
fn rendered_xml_is_ordered() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let xml = env.source("default-sp").hosted_metadata()?.to_xml();

    let position = |needle: &str| xml.find(needle).unwrap_or_else(|| panic!("missing {needle}"));
    assert!(position("<md:EntityDescriptor") < position("<mdattr:EntityAttributes"));
    assert!(position("<md:KeyDescriptor") < position("<md:SingleLogoutService"));
    assert!(position("<md:AssertionConsumerService") < position("<md:AttributeConsumingService"));
    assert!(position("</md:SPSSODescriptor>") < position("<md:Organization>"));
    assert!(position("<md:Organization>") < position("<md:ContactPerson"));
    assert!(xml.contains(r#"entityID="https://sp.example.org/sp""#));
    Ok(())
}

#[test]
fn holder_of_key_endpoint_is_added() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let md = env.source("fixed-sp").hosted_metadata()?;

    let hok = md
        .assertion_consumer_services
        .iter()
        .find(|e| e.hok_protocol_binding.is_some())
        .expect("holder-of-key endpoint");
    assert_eq!(hok.index, 2);
    assert_eq!(hok.hok_protocol_binding.as_deref(), Some(SamlBinding::HttpRedirect.uri()));
    Ok(())
}

#[test]
fn metadata_hook_sees_every_document() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.registry
        .register_hook::<MetadataDocument, _>("saml", "metadata_hosted", |md| {
            md.entity_attributes
                .entry("urn:example:hooked".to_string())
                .or_default()
                .push("yes".to_string());
            Ok(())
        });

    for source in env.sources.values().map(Arc::clone) {
        let md = source.hosted_metadata()?;
        assert_eq!(md.entity_attributes["urn:example:hooked"], ["yes"]);
    }
    Ok(())
}
