//! XML Signature creation.

use base64::Engine;
use sp_core::config::KeyPairConfig;

use crate::error::{SamlError, SamlResult};
use crate::types::{ENVELOPED_SIGNATURE, EXCLUSIVE_C14N, XMLDSIG_NS};

use super::{MessageSigner, SignatureAlgorithm};

/// Signs messages with the service provider's current key pair.
pub struct XmlSigner {
    private_key_der: Vec<u8>,
    /// Base64 DER certificate for `<ds:KeyInfo>`.
    certificate: Option<String>,
    algorithm: SignatureAlgorithm,
}

impl std::fmt::Debug for XmlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlSigner")
            .field("algorithm", &self.algorithm)
            .field("has_certificate", &self.certificate.is_some())
            .finish_non_exhaustive()
    }
}

impl XmlSigner {
    /// Creates a signer from a DER private key and optional base64 certificate.
    #[must_use]
    pub fn new(private_key_der: Vec<u8>, certificate: Option<String>) -> Self {
        Self {
            private_key_der,
            certificate,
            algorithm: SignatureAlgorithm::default(),
        }
    }

    /// Creates a signer from PEM-encoded key and certificate.
    ///
    /// # Errors
    ///
    /// Returns an error if either PEM block is missing or malformed.
    pub fn from_pem(private_key_pem: &str, certificate_pem: Option<&str>) -> SamlResult<Self> {
        let private_key_der = sp_crypto::private_key_der(private_key_pem)?;
        let certificate = certificate_pem
            .map(sp_crypto::certificate_base64)
            .transpose()?;
        Ok(Self::new(private_key_der, certificate))
    }

    /// Creates a signer from a configured key pair.
    ///
    /// # Errors
    ///
    /// Returns an error if either PEM block is missing or malformed.
    pub fn from_key_pair(key_pair: &KeyPairConfig) -> SamlResult<Self> {
        Self::from_pem(&key_pair.private_key, Some(&key_pair.certificate))
    }

    /// Sets the signature algorithm.
    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Returns the signature algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    fn sign_data(&self, data: &[u8]) -> SamlResult<Vec<u8>> {
        sp_crypto::rsa_sign(&self.private_key_der, data, self.algorithm.rsa())
            .map_err(|e| SamlError::SignatureCreation(e.to_string()))
    }
}

impl MessageSigner for XmlSigner {
    fn sign_xml(&self, xml: &str, reference_id: &str) -> SamlResult<String> {
        let b64 = base64::engine::general_purpose::STANDARD;
        let (element_start, insert_position) = find_element_and_insert_position(xml, reference_id)?;

        let canonical_element = normalize_xml_whitespace(extract_element(xml, element_start)?);
        let digest = sp_crypto::digest(self.algorithm.digest(), canonical_element.as_bytes());

        let signed_info = build_signed_info(reference_id, &b64.encode(digest), self.algorithm);
        let signature_value = self.sign_data(normalize_xml_whitespace(&signed_info).as_bytes())?;

        let mut signature = format!(
            r#"<ds:Signature xmlns:ds="{XMLDSIG_NS}">{signed_info}<ds:SignatureValue>{}</ds:SignatureValue>"#,
            b64.encode(signature_value)
        );
        if let Some(cert) = &self.certificate {
            signature.push_str(&format!(
                "<ds:KeyInfo><ds:X509Data><ds:X509Certificate>{cert}</ds:X509Certificate></ds:X509Data></ds:KeyInfo>"
            ));
        }
        signature.push_str("</ds:Signature>");

        tracing::trace!(reference_id, algorithm = self.algorithm.uri(), "message signed");
        Ok(format!("{}{signature}{}", &xml[..insert_position], &xml[insert_position..]))
    }

    fn sign_redirect_query(&self, query: &str) -> SamlResult<String> {
        let to_sign = format!("{query}&SigAlg={}", urlencoding::encode(self.algorithm.uri()));
        let signature = self.sign_data(to_sign.as_bytes())?;
        let signature_b64 = base64::engine::general_purpose::STANDARD.encode(signature);
        Ok(format!("{to_sign}&Signature={}", urlencoding::encode(&signature_b64)))
    }
}

/// Finds the start of the element carrying `reference_id` and the
/// position directly after its `<saml:Issuer>`.
fn find_element_and_insert_position(xml: &str, reference_id: &str) -> SamlResult<(usize, usize)> {
    let id_attr = xml
        .find(&format!(" ID=\"{reference_id}\""))
        .ok_or_else(|| {
            SamlError::SignatureCreation(format!("Element with ID '{reference_id}' not found"))
        })?;

    let element_start = xml[..id_attr]
        .rfind('<')
        .ok_or_else(|| SamlError::SignatureCreation("Malformed XML element".to_string()))?;

    let tag_end = xml[id_attr..]
        .find('>')
        .map(|pos| id_attr + pos + 1)
        .ok_or_else(|| SamlError::SignatureCreation("Malformed XML element".to_string()))?;

    let insert = xml[tag_end..]
        .find("</saml:Issuer>")
        .map_or(tag_end, |pos| tag_end + pos + "</saml:Issuer>".len());

    Ok((element_start, insert))
}

/// Returns the complete element starting at `start`.
fn extract_element(xml: &str, start: usize) -> SamlResult<&str> {
    let name_end = xml[start + 1..]
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .map(|pos| start + 1 + pos)
        .ok_or_else(|| SamlError::SignatureCreation("Malformed XML element".to_string()))?;
    let close = format!("</{}>", &xml[start + 1..name_end]);

    xml[start..]
        .rfind(&close)
        .map(|pos| &xml[start..start + pos + close.len()])
        .ok_or_else(|| {
            SamlError::SignatureCreation(format!("Unclosed XML element '{}'", &xml[start + 1..name_end]))
        })
}

/// Collapses whitespace runs (simplified canonicalization).
fn normalize_xml_whitespace(xml: &str) -> String {
    xml.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn build_signed_info(reference_id: &str, digest_b64: &str, algorithm: SignatureAlgorithm) -> String {
    format!(
        concat!(
            r#"<ds:SignedInfo xmlns:ds="{ns}">"#,
            r#"<ds:CanonicalizationMethod Algorithm="{c14n}"/>"#,
            r#"<ds:SignatureMethod Algorithm="{sig}"/>"#,
            r##"<ds:Reference URI="#{id}">"##,
            r#"<ds:Transforms><ds:Transform Algorithm="{env}"/><ds:Transform Algorithm="{c14n}"/></ds:Transforms>"#,
            r#"<ds:DigestMethod Algorithm="{dig}"/>"#,
            r#"<ds:DigestValue>{digest}</ds:DigestValue>"#,
            r#"</ds:Reference></ds:SignedInfo>"#,
        ),
        ns = XMLDSIG_NS,
        c14n = EXCLUSIVE_C14N,
        sig = algorithm.uri(),
        id = reference_id,
        env = ENVELOPED_SIGNATURE,
        dig = algorithm.digest_uri(),
        digest = digest_b64,
    )
}
