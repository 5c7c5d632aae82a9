//! Hosted SP metadata.
//!
//! [`synthesize`] turns one source's configuration into a
//! [`MetadataDocument`]. The document is a plain value: it is rebuilt on
//! every request and rendered with [`MetadataDocument::to_xml`].

mod xml;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use sp_core::config::{ContactAttribute, KeyPairConfig, RegistrationInfo, UiInfo};
use sp_core::{GlobalConfig, SpConfig};

use crate::error::{SamlError, SamlResult};
use crate::location::SpLocations;
use crate::types::{Endpoint, NameIdPolicy, SamlBinding, PLACEHOLDER_ENTITY_ID, SAML2_PROTOCOL};

/// An indexed assertion consumer endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedEndpoint {
    /// Endpoint index.
    pub index: u32,
    /// Binding URI.
    pub binding: String,
    /// Endpoint URL.
    pub location: String,
    /// Default flag, only when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    /// Transport binding for holder-of-key endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hok_protocol_binding: Option<String>,
}

/// A published certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyDescriptor {
    /// Base64 DER certificate.
    pub certificate: String,
    /// Usable for signing.
    pub signing: bool,
    /// Usable for encryption.
    pub encryption: bool,
    /// Configuration slot the key came from: `""` or `"new_"`.
    pub prefix: &'static str,
}

/// Contact person types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    /// Technical contact.
    Technical,
    /// Support contact.
    Support,
    /// Administrative contact.
    Administrative,
    /// Billing contact.
    Billing,
    /// Other contact.
    Other,
}

impl ContactType {
    /// Every contact type, in schema order.
    pub const ALL: [Self; 5] = [
        Self::Technical,
        Self::Support,
        Self::Administrative,
        Self::Billing,
        Self::Other,
    ];

    /// Returns the `contactType` attribute value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Support => "support",
            Self::Administrative => "administrative",
            Self::Billing => "billing",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactType {
    type Err = SamlError;

    fn from_str(s: &str) -> SamlResult<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let expected = Self::ALL
                    .iter()
                    .map(|t| format!("\"{t}\""))
                    .collect::<Vec<_>>()
                    .join(", ");
                SamlError::Validation(format!("Expected one of: {expected}. Got: \"{s}\""))
            })
    }
}

/// A published contact person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactPerson {
    /// Contact type.
    pub contact_type: ContactType,
    /// Company name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Surname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sur_name: Option<String>,
    /// `mailto:` addresses.
    pub email_addresses: Vec<String>,
    /// Telephone numbers.
    pub telephone_numbers: Vec<String>,
    /// Namespaced attributes on the element.
    pub attributes: Vec<ContactAttribute>,
}

/// Organization details, keyed by language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organization {
    /// Organization name.
    pub name: BTreeMap<String, String>,
    /// Display name.
    pub display_name: BTreeMap<String, String>,
    /// Organization URL.
    pub url: BTreeMap<String, String>,
}

/// Attributes the SP asks for, with the service's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeConsumingService {
    /// Service name, keyed by language.
    pub name: BTreeMap<String, String>,
    /// Service description, keyed by language.
    pub description: BTreeMap<String, String>,
    /// Requested attributes, friendly name to attribute name.
    pub attributes: BTreeMap<String, String>,
    /// Required attributes, friendly name to attribute name.
    pub attributes_required: BTreeMap<String, String>,
    /// Name format of the attribute names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_format: Option<String>,
    /// Service index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    /// Default flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// Synthesized SP metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataDocument {
    /// Entity ID.
    pub entity_id: String,
    /// Assertion consumer endpoints.
    pub assertion_consumer_services: Vec<IndexedEndpoint>,
    /// Single logout endpoints.
    pub single_logout_services: Vec<Endpoint>,
    /// Name ID policy.
    pub name_id_policy: NameIdPolicy,
    /// Published keys; a rollover key comes first.
    pub keys: Vec<KeyDescriptor>,
    /// Contact persons.
    pub contacts: Vec<ContactPerson>,
    /// Organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<Organization>,
    /// Requested attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_consuming_service: Option<AttributeConsumingService>,
    /// User interface information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_info: Option<UiInfo>,
    /// Entity attributes.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub entity_attributes: BTreeMap<String, Vec<String>>,
    /// Registration information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_info: Option<RegistrationInfo>,
    /// Whether redirect-bound requests are signed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_validate: Option<bool>,
    /// Whether authentication requests are signed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate_authnrequest: Option<bool>,
    /// Whether assertions must be signed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_assertion: Option<bool>,
    /// Supported protocol URIs.
    pub supported_protocols: Vec<String>,
}

impl MetadataDocument {
    /// The first assertion consumer endpoint.
    #[must_use]
    pub fn default_acs(&self) -> Option<&IndexedEndpoint> {
        self.assertion_consumer_services
            .iter()
            .find(|e| e.is_default == Some(true))
            .or_else(|| self.assertion_consumer_services.first())
    }
}

/// Rejects empty and sample entity IDs.
///
/// # Errors
///
/// Returns [`SamlError::Validation`] naming the `entityID` option.
pub fn validate_entity_id(entity_id: &str) -> SamlResult<()> {
    if entity_id.is_empty() {
        return Err(SamlError::Validation("entityID must be set".to_string()));
    }
    if entity_id == PLACEHOLDER_ENTITY_ID {
        return Err(SamlError::Validation(format!(
            "entityID is still the sample value '{PLACEHOLDER_ENTITY_ID}'; set it to this SP's own entity ID"
        )));
    }
    Ok(())
}

/// Builds the hosted metadata for source `source_id`.
///
/// # Errors
///
/// Returns [`SamlError::Validation`] for bad contacts, organization or entity
/// ID, and a crypto error for unreadable certificates.
pub fn synthesize(config: &SpConfig, source_id: &str, global: &GlobalConfig) -> SamlResult<MetadataDocument> {
    validate_entity_id(&config.entity_id)?;
    let locations = SpLocations::new(global.base_url(), source_id);

    let (redirect_validate, validate_authnrequest) = match (config.redirect_sign, config.sign_authnrequest) {
        (Some(v), _) => (Some(v), None),
        (None, v) => (None, v),
    };

    Ok(MetadataDocument {
        entity_id: config.entity_id.clone(),
        assertion_consumer_services: acs_endpoints(config, &locations),
        single_logout_services: slo_endpoints(config, &locations),
        name_id_policy: config
            .name_id_policy
            .as_ref()
            .map(NameIdPolicy::from)
            .unwrap_or_default(),
        keys: keys(config.credentials.as_ref(), config.rollover_credentials.as_ref())?,
        contacts: contacts(config, global)?,
        organization: organization(config)?,
        attribute_consuming_service: attribute_consuming_service(config),
        ui_info: config.ui_info.clone().filter(|ui| !ui.is_empty()),
        entity_attributes: config.entity_attributes.clone(),
        registration_info: config.registration_info.clone(),
        redirect_validate,
        validate_authnrequest,
        sign_assertion: config.want_assertions_signed,
        supported_protocols: vec![SAML2_PROTOCOL.to_string()],
    })
}

pub(crate) fn acs_endpoints(config: &SpConfig, locations: &SpLocations) -> Vec<IndexedEndpoint> {
    if let Some(explicit) = &config.assertion_consumer_service {
        return explicit
            .iter()
            .map(|e| IndexedEndpoint {
                index: e.index,
                binding: e.binding.clone(),
                location: e.location.clone(),
                is_default: e.is_default,
                hok_protocol_binding: None,
            })
            .collect();
    }

    let default_bindings = [SamlBinding::HttpPost.uri(), SamlBinding::HttpArtifact.uri()];
    let bindings: Vec<&str> = config.acs_bindings.as_ref().map_or_else(
        || default_bindings.to_vec(),
        |b| b.iter().map(String::as_str).collect(),
    );

    let mut endpoints: Vec<IndexedEndpoint> = bindings
        .into_iter()
        .filter_map(|uri| match SamlBinding::from_uri(uri) {
            Some(binding) if binding.is_acs_binding() => Some(binding),
            _ => {
                tracing::debug!(binding = uri, "skipping unsupported ACS binding");
                None
            }
        })
        .zip(0u32..)
        .map(|(binding, index)| IndexedEndpoint {
            index,
            binding: binding.uri().to_string(),
            location: locations.acs_for(binding),
            is_default: None,
            hok_protocol_binding: None,
        })
        .collect();

    if config.protocol_binding.as_deref() == Some(SamlBinding::HolderOfKey.uri()) {
        let index = endpoints.last().map_or(0, |e| e.index + 1);
        endpoints.push(IndexedEndpoint {
            index,
            binding: SamlBinding::HolderOfKey.uri().to_string(),
            location: locations.acs_for(SamlBinding::HolderOfKey),
            is_default: None,
            hok_protocol_binding: Some(SamlBinding::HttpRedirect.uri().to_string()),
        });
    }
    endpoints
}

fn slo_endpoints(config: &SpConfig, locations: &SpLocations) -> Vec<Endpoint> {
    let default_bindings = [SamlBinding::HttpRedirect.uri(), SamlBinding::Soap.uri()];
    let bindings: Vec<&str> = config.slo_bindings.as_ref().map_or_else(
        || default_bindings.to_vec(),
        |b| b.iter().map(String::as_str).collect(),
    );
    let location = config.slo_location.clone().unwrap_or_else(|| locations.slo());

    bindings
        .into_iter()
        .map(|binding| Endpoint {
            binding: binding.to_string(),
            location: location.clone(),
        })
        .collect()
}

fn keys(current: Option<&KeyPairConfig>, rollover: Option<&KeyPairConfig>) -> SamlResult<Vec<KeyDescriptor>> {
    let mut keys = Vec::new();
    if let Some(new) = rollover {
        keys.push(KeyDescriptor {
            certificate: sp_crypto::certificate_base64(&new.certificate)?,
            signing: true,
            encryption: true,
            prefix: "new_",
        });
    }
    if let Some(old) = current {
        keys.push(KeyDescriptor {
            certificate: sp_crypto::certificate_base64(&old.certificate)?,
            signing: true,
            encryption: rollover.is_none(),
            prefix: "",
        });
    }
    Ok(keys)
}

fn mailto(address: &str) -> String {
    if address.starts_with("mailto:") {
        address.to_string()
    } else {
        format!("mailto:{address}")
    }
}

/// A namespace prefix may be shared by several attributes of one contact,
/// but must always name the same URI.
fn check_attribute_namespaces(attributes: &[ContactAttribute]) -> SamlResult<()> {
    let mut bound: BTreeMap<&str, &str> = BTreeMap::new();
    for attr in attributes {
        let uri = *bound
            .entry(attr.namespace_prefix.as_str())
            .or_insert(attr.namespace_uri.as_str());
        if uri != attr.namespace_uri {
            return Err(SamlError::Validation(format!(
                "Contact attribute prefix \"{}\" is bound to both \"{uri}\" and \"{}\"",
                attr.namespace_prefix, attr.namespace_uri
            )));
        }
    }
    Ok(())
}

fn contacts(config: &SpConfig, global: &GlobalConfig) -> SamlResult<Vec<ContactPerson>> {
    let mut contacts = config
        .contacts
        .iter()
        .map(|c| -> SamlResult<ContactPerson> {
            check_attribute_namespaces(&c.attributes)?;
            Ok(ContactPerson {
                contact_type: c.contact_type.parse()?,
                company: c.company.clone(),
                given_name: c.given_name.clone(),
                sur_name: c.sur_name.clone(),
                email_addresses: c.email_address.iter().map(|e| mailto(e)).collect(),
                telephone_numbers: c.telephone_number.clone(),
                attributes: c.attributes.clone(),
            })
        })
        .collect::<SamlResult<Vec<_>>>()?;

    if let Some((name, email)) = global.technical_contact() {
        contacts.push(ContactPerson {
            contact_type: ContactType::Technical,
            company: None,
            given_name: Some(name.to_string()),
            sur_name: None,
            email_addresses: vec![mailto(email)],
            telephone_numbers: Vec::new(),
            attributes: Vec::new(),
        });
    }
    Ok(contacts)
}

fn organization(config: &SpConfig) -> SamlResult<Option<Organization>> {
    if config.organization_name.is_empty() {
        return Ok(None);
    }
    if config.organization_url.is_empty() {
        return Err(SamlError::Validation(
            "If OrganizationName is set, OrganizationURL must also be set.".to_string(),
        ));
    }

    let mut display_name = config.organization_display_name.clone();
    for (lang, name) in &config.organization_name {
        display_name
            .entry(lang.clone())
            .or_insert_with(|| name.clone());
    }
    Ok(Some(Organization {
        name: config.organization_name.clone(),
        display_name,
        url: config.organization_url.clone(),
    }))
}

fn attribute_consuming_service(config: &SpConfig) -> Option<AttributeConsumingService> {
    if config.name.is_empty() || config.attributes.is_empty() {
        return None;
    }
    Some(AttributeConsumingService {
        name: config.name.clone(),
        description: config.description.clone(),
        attributes: config.attributes.clone(),
        attributes_required: config.attributes_required.clone(),
        name_format: config.attributes_name_format.clone(),
        index: config.attributes_index,
        is_default: config.attributes_is_default,
    })
}
