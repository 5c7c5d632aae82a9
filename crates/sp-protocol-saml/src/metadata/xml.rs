//! `md:EntityDescriptor` rendering.
//!
//! Output is a pure function of the document: elements follow schema order
//! and every map is iterated in key order.

use std::collections::{BTreeMap, BTreeSet};

use sp_core::config::{RegistrationInfo, UiInfo};

use super::{AttributeConsumingService, ContactPerson, KeyDescriptor, MetadataDocument, Organization};
use crate::types::{HOLDER_OF_KEY_SSO, MDATTR_NS, MDRPI_NS, MDUI_NS, MD_NS, SAML_NS, XMLDSIG_NS};
use crate::xml::escape;

const URI_NAME_FORMAT: &str = "urn:oasis:names:tc:SAML:2.0:attrname-format:uri";

/// Indented line writer.
struct Writer {
    out: String,
    depth: usize,
}

impl Writer {
    fn new() -> Self {
        Self {
            out: String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"),
            depth: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    /// One `<tag xml:lang="..">value</tag>` per entry.
    fn localized(&mut self, tag: &str, values: &BTreeMap<String, String>) {
        for (lang, value) in values {
            self.line(&format!(
                r#"<{tag} xml:lang="{}">{}</{tag}>"#,
                escape(lang),
                escape(value)
            ));
        }
    }
}

impl MetadataDocument {
    /// Renders the document as SAML 2.0 metadata.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut w = Writer::new();
        w.open(&format!(
            r#"<md:EntityDescriptor xmlns:md="{MD_NS}" entityID="{}">"#,
            escape(&self.entity_id)
        ));

        if !self.entity_attributes.is_empty() || self.registration_info.is_some() {
            w.open("<md:Extensions>");
            if !self.entity_attributes.is_empty() {
                entity_attributes(&mut w, &self.entity_attributes);
            }
            if let Some(info) = &self.registration_info {
                registration_info(&mut w, info);
            }
            w.close("</md:Extensions>");
        }

        let mut sp_attrs = format!(
            r#"protocolSupportEnumeration="{}""#,
            escape(&self.supported_protocols.join(" "))
        );
        if let Some(signed) = self.redirect_validate.or(self.validate_authnrequest) {
            sp_attrs.push_str(&format!(r#" AuthnRequestsSigned="{signed}""#));
        }
        if let Some(signed) = self.sign_assertion {
            sp_attrs.push_str(&format!(r#" WantAssertionsSigned="{signed}""#));
        }
        w.open(&format!("<md:SPSSODescriptor {sp_attrs}>"));

        if let Some(ui) = &self.ui_info {
            w.open("<md:Extensions>");
            ui_info(&mut w, ui);
            w.close("</md:Extensions>");
        }
        for key in &self.keys {
            key_descriptors(&mut w, key);
        }
        for slo in &self.single_logout_services {
            w.line(&format!(
                r#"<md:SingleLogoutService Binding="{}" Location="{}"/>"#,
                escape(&slo.binding),
                escape(&slo.location)
            ));
        }
        w.line(&format!(
            "<md:NameIDFormat>{}</md:NameIDFormat>",
            escape(&self.name_id_policy.format)
        ));
        for acs in &self.assertion_consumer_services {
            let mut attrs = format!(
                r#"Binding="{}" Location="{}" index="{}""#,
                escape(&acs.binding),
                escape(&acs.location),
                acs.index
            );
            if let Some(default) = acs.is_default {
                attrs.push_str(&format!(r#" isDefault="{default}""#));
            }
            if let Some(binding) = &acs.hok_protocol_binding {
                attrs.push_str(&format!(
                    r#" xmlns:hoksso="{HOLDER_OF_KEY_SSO}" hoksso:ProtocolBinding="{}""#,
                    escape(binding)
                ));
            }
            w.line(&format!("<md:AssertionConsumerService {attrs}/>"));
        }
        if let Some(service) = &self.attribute_consuming_service {
            attribute_consuming_service(&mut w, service);
        }
        w.close("</md:SPSSODescriptor>");

        if let Some(org) = &self.organization {
            organization(&mut w, org);
        }
        for contact in &self.contacts {
            contact_person(&mut w, contact);
        }

        w.close("</md:EntityDescriptor>");
        w.out
    }
}

/// Splits `{format}name` keys.
fn split_attribute_name(key: &str) -> (&str, &str) {
    key.strip_prefix('{')
        .and_then(|rest| rest.split_once('}'))
        .unwrap_or((URI_NAME_FORMAT, key))
}

fn entity_attributes(w: &mut Writer, attributes: &BTreeMap<String, Vec<String>>) {
    w.open(&format!(r#"<mdattr:EntityAttributes xmlns:mdattr="{MDATTR_NS}">"#));
    for (key, values) in attributes {
        let (format, name) = split_attribute_name(key);
        w.open(&format!(
            r#"<saml:Attribute xmlns:saml="{SAML_NS}" Name="{}" NameFormat="{}">"#,
            escape(name),
            escape(format)
        ));
        for value in values {
            w.line(&format!("<saml:AttributeValue>{}</saml:AttributeValue>", escape(value)));
        }
        w.close("</saml:Attribute>");
    }
    w.close("</mdattr:EntityAttributes>");
}

fn registration_info(w: &mut Writer, info: &RegistrationInfo) {
    let mut attrs = format!(r#"registrationAuthority="{}""#, escape(&info.authority));
    if let Some(instant) = &info.instant {
        attrs.push_str(&format!(r#" registrationInstant="{}""#, escape(instant)));
    }
    w.open(&format!(r#"<mdrpi:RegistrationInfo xmlns:mdrpi="{MDRPI_NS}" {attrs}>"#));
    w.localized("mdrpi:RegistrationPolicy", &info.policies);
    w.close("</mdrpi:RegistrationInfo>");
}

fn ui_info(w: &mut Writer, ui: &UiInfo) {
    w.open(&format!(r#"<mdui:UIInfo xmlns:mdui="{MDUI_NS}">"#));
    w.localized("mdui:DisplayName", &ui.display_name);
    w.localized("mdui:Description", &ui.description);
    for (lang, keywords) in &ui.keywords {
        w.line(&format!(
            r#"<mdui:Keywords xml:lang="{}">{}</mdui:Keywords>"#,
            escape(lang),
            escape(&keywords.join(" "))
        ));
    }
    for logo in &ui.logo {
        let lang = logo
            .lang
            .as_deref()
            .map(|l| format!(r#" xml:lang="{}""#, escape(l)))
            .unwrap_or_default();
        w.line(&format!(
            r#"<mdui:Logo height="{}" width="{}"{lang}>{}</mdui:Logo>"#,
            logo.height,
            logo.width,
            escape(&logo.url)
        ));
    }
    w.localized("mdui:InformationURL", &ui.information_url);
    w.localized("mdui:PrivacyStatementURL", &ui.privacy_statement_url);
    w.close("</mdui:UIInfo>");
}

fn key_descriptors(w: &mut Writer, key: &KeyDescriptor) {
    for (usage, enabled) in [("signing", key.signing), ("encryption", key.encryption)] {
        if !enabled {
            continue;
        }
        w.open(&format!(r#"<md:KeyDescriptor use="{usage}">"#));
        w.open(&format!(r#"<ds:KeyInfo xmlns:ds="{XMLDSIG_NS}">"#));
        w.open("<ds:X509Data>");
        w.line(&format!("<ds:X509Certificate>{}</ds:X509Certificate>", key.certificate));
        w.close("</ds:X509Data>");
        w.close("</ds:KeyInfo>");
        w.close("</md:KeyDescriptor>");
    }
}

fn attribute_consuming_service(w: &mut Writer, service: &AttributeConsumingService) {
    let mut attrs = format!(r#"index="{}""#, service.index.unwrap_or(0));
    if let Some(default) = service.is_default {
        attrs.push_str(&format!(r#" isDefault="{default}""#));
    }
    w.open(&format!("<md:AttributeConsumingService {attrs}>"));
    w.localized("md:ServiceName", &service.name);
    w.localized("md:ServiceDescription", &service.description);

    let name_format = service
        .name_format
        .as_deref()
        .map(|f| format!(r#" NameFormat="{}""#, escape(f)))
        .unwrap_or_default();
    let optional = service
        .attributes
        .iter()
        .filter(|(friendly, _)| !service.attributes_required.contains_key(*friendly));
    for (friendly, name, required) in service
        .attributes_required
        .iter()
        .map(|(f, n)| (f, n, true))
        .chain(optional.map(|(f, n)| (f, n, false)))
    {
        let required = if required { r#" isRequired="true""# } else { "" };
        w.line(&format!(
            r#"<md:RequestedAttribute FriendlyName="{}" Name="{}"{name_format}{required}/>"#,
            escape(friendly),
            escape(name)
        ));
    }
    w.close("</md:AttributeConsumingService>");
}

fn organization(w: &mut Writer, org: &Organization) {
    w.open("<md:Organization>");
    w.localized("md:OrganizationName", &org.name);
    w.localized("md:OrganizationDisplayName", &org.display_name);
    w.localized("md:OrganizationURL", &org.url);
    w.close("</md:Organization>");
}

fn contact_person(w: &mut Writer, contact: &ContactPerson) {
    let mut attrs = format!(r#"contactType="{}""#, contact.contact_type);
    let mut declared = BTreeSet::new();
    for attr in &contact.attributes {
        let prefix = escape(&attr.namespace_prefix);
        if declared.insert(attr.namespace_prefix.as_str()) {
            attrs.push_str(&format!(r#" xmlns:{prefix}="{}""#, escape(&attr.namespace_uri)));
        }
        attrs.push_str(&format!(
            r#" {prefix}:{}="{}""#,
            escape(&attr.attr_name),
            escape(&attr.attr_value)
        ));
    }
    w.open(&format!("<md:ContactPerson {attrs}>"));
    for (tag, value) in [
        ("md:Company", &contact.company),
        ("md:GivenName", &contact.given_name),
        ("md:SurName", &contact.sur_name),
    ] {
        if let Some(value) = value {
            w.line(&format!("<{tag}>{}</{tag}>", escape(value)));
        }
    }
    for email in &contact.email_addresses {
        w.line(&format!("<md:EmailAddress>{}</md:EmailAddress>", escape(email)));
    }
    for phone in &contact.telephone_numbers {
        w.line(&format!("<md:TelephoneNumber>{}</md:TelephoneNumber>", escape(phone)));
    }
    w.close("</md:ContactPerson>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::synthesize;
    use crate::xml::check_single_element;
    use sp_core::config::{ContactAttribute, ContactConfig, KeyPairConfig, UiLogo};
    use sp_core::{GlobalConfig, SpConfig};

    const CERT: &str = include_str!("../../../sp-crypto/testdata/sp.crt");
    const KEY: &str = include_str!("../../../sp-crypto/testdata/sp.key");

    fn full_config() -> SpConfig {
        let mut config = SpConfig::new("urn:x-simplesamlphp:example-sp");
        config.credentials = Some(KeyPairConfig::from_pem(KEY, CERT));
        config.protocol_binding = Some(HOLDER_OF_KEY_SSO.to_string());
        config.want_assertions_signed = Some(true);
        config.sign_authnrequest = Some(true);
        config.contacts = vec![ContactConfig {
            contact_type: "other".to_string(),
            given_name: Some("Security".to_string()),
            email_address: vec!["security@example.org".to_string()],
            attributes: vec![ContactAttribute {
                namespace_uri: "http://refeds.org/metadata".to_string(),
                namespace_prefix: "remd".to_string(),
                attr_name: "contactType".to_string(),
                attr_value: "http://refeds.org/metadata/contactType/security".to_string(),
            }],
            ..ContactConfig::default()
        }];
        config.organization_name.insert("en".to_string(), "Example & Co".to_string());
        config.organization_url.insert("en".to_string(), "https://example.org".to_string());
        config.name.insert("en".to_string(), "My First SP".to_string());
        config.attributes.insert("mail".to_string(), "urn:oid:0.9.2342.19200300.100.1.3".to_string());
        config.attributes_required.insert(
            "eduPersonPrincipalName".to_string(),
            "urn:oid:1.3.6.1.4.1.5923.1.1.1.6".to_string(),
        );
        config.entity_attributes.insert("{urn:simplesamlphp:v1}foo".to_string(), vec!["bar".to_string()]);
        config.registration_info = Some(RegistrationInfo {
            authority: "urn:mace:sp.example.org".to_string(),
            instant: Some("2008-01-17T11:28:03.577Z".to_string()),
            policies: [("en".to_string(), "http://sp.example.org/policy".to_string())].into(),
        });
        let mut ui = UiInfo::default();
        ui.display_name.insert("en".to_string(), "English name".to_string());
        ui.logo.push(UiLogo {
            url: "https://example.org/logo.png".to_string(),
            height: 16,
            width: 16,
            lang: None,
        });
        config.ui_info = Some(ui);
        config
    }

    fn render(config: &SpConfig) -> String {
        let global = GlobalConfig {
            base_url: "https://sp.example.org".to_string(),
            ..GlobalConfig::default()
        };
        synthesize(config, "default-sp", &global).unwrap().to_xml()
    }

    #[test]
    fn renders_well_formed_descriptor() {
        let xml = render(&full_config());
        let body = xml.strip_prefix("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n").unwrap();
        check_single_element(body).unwrap();
        assert!(xml.contains(r#"entityID="urn:x-simplesamlphp:example-sp""#));
        assert!(xml.contains("Example &amp; Co"));
    }

    #[test]
    fn sp_descriptor_children_are_in_schema_order() {
        let xml = render(&full_config());
        let order = [
            "<md:SPSSODescriptor",
            "<mdui:UIInfo",
            "<md:KeyDescriptor use=\"signing\">",
            "<md:KeyDescriptor use=\"encryption\">",
            "<md:SingleLogoutService",
            "<md:NameIDFormat>",
            "<md:AssertionConsumerService",
            "<md:AttributeConsumingService",
            "</md:SPSSODescriptor>",
            "<md:Organization>",
            "<md:ContactPerson",
        ];
        let positions: Vec<usize> = order.iter().map(|tag| xml.find(tag).unwrap()).collect();
        assert!(positions.windows(2).all(|p| p[0] < p[1]), "{xml}");
    }

    #[test]
    fn flags_and_hok_binding() {
        let xml = render(&full_config());
        assert!(xml.contains(r#"AuthnRequestsSigned="true" WantAssertionsSigned="true""#));
        assert!(xml.contains(r#"hoksso:ProtocolBinding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect""#));
        assert!(xml.contains(r#"index="2""#));
    }

    #[test]
    fn extensions_and_contacts() {
        let xml = render(&full_config());
        assert!(xml.contains(r#"<saml:Attribute xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" Name="foo" NameFormat="urn:simplesamlphp:v1">"#));
        assert!(xml.contains(r#"registrationInstant="2008-01-17T11:28:03.577Z""#));
        assert!(xml.contains(r#"<mdui:Logo height="16" width="16">https://example.org/logo.png</mdui:Logo>"#));
        assert!(xml.contains(r#"xmlns:remd="http://refeds.org/metadata" remd:contactType="http://refeds.org/metadata/contactType/security""#));
        assert!(xml.contains("<md:EmailAddress>mailto:security@example.org</md:EmailAddress>"));
        assert!(xml.contains(r#"<md:OrganizationDisplayName xml:lang="en">Example &amp; Co</md:OrganizationDisplayName>"#));
    }

    #[test]
    fn shared_contact_prefix_is_declared_once() {
        use quick_xml::events::Event;
        use quick_xml::Reader;

        let mut config = full_config();
        config.contacts[0].attributes.push(ContactAttribute {
            namespace_uri: "http://refeds.org/metadata".to_string(),
            namespace_prefix: "remd".to_string(),
            attr_name: "other".to_string(),
            attr_value: "v".to_string(),
        });
        let xml = render(&config);
        assert_eq!(xml.matches(r#"xmlns:remd="#).count(), 1);
        assert!(xml.contains(r#"remd:other="v""#));

        let mut reader = Reader::from_str(&xml);
        let mut contacts = 0;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) => {
                    let attrs = e.attributes().collect::<Result<Vec<_>, _>>().unwrap();
                    if e.name().as_ref() == b"md:ContactPerson" {
                        contacts += 1;
                        assert_eq!(attrs.len(), 4);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        assert_eq!(contacts, 1);
    }

    #[test]
    fn requested_attributes() {
        let xml = render(&full_config());
        assert!(xml.contains(r#"<md:RequestedAttribute FriendlyName="eduPersonPrincipalName" Name="urn:oid:1.3.6.1.4.1.5923.1.1.1.6" isRequired="true"/>"#));
        assert!(xml.contains(r#"<md:RequestedAttribute FriendlyName="mail" Name="urn:oid:0.9.2342.19200300.100.1.3"/>"#));
    }

    #[test]
    fn attribute_names_without_format() {
        assert_eq!(split_attribute_name("{urn:x}foo"), ("urn:x", "foo"));
        assert_eq!(split_attribute_name("http://macedir.org/entity-category"), (URI_NAME_FORMAT, "http://macedir.org/entity-category"));
    }

    #[test]
    fn minimal_document_has_no_optional_parts() {
        let xml = render(&SpConfig::new("https://sp.example.org"));
        assert!(!xml.contains("<md:Extensions>"));
        assert!(!xml.contains("KeyDescriptor"));
        assert!(!xml.contains("AuthnRequestsSigned"));
        assert!(!xml.contains("ContactPerson"));
        assert!(xml.ends_with("</md:EntityDescriptor>\n"));
    }
}
