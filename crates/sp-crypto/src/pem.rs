//! PEM decoding for keys and certificates.

use base64::Engine;

use crate::error::CryptoError;

const PRIVATE_KEY_LABELS: [&str; 2] = ["PRIVATE KEY", "RSA PRIVATE KEY"];

/// Extracts the DER payload of the first PEM block with the given label.
#[must_use]
pub fn pem_to_der(pem: &str, label: &str) -> Option<Vec<u8>> {
    let begin = format!("-----BEGIN {label}-----");
    let end = format!("-----END {label}-----");

    let start = pem.find(&begin)? + begin.len();
    let end_pos = start + pem[start..].find(&end)?;

    let b64_data: String = pem[start..end_pos]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    base64::engine::general_purpose::STANDARD.decode(b64_data).ok()
}

/// Decodes a PKCS#8 or PKCS#1 private key.
///
/// # Errors
///
/// Returns an error if no private key block is present.
pub fn private_key_der(pem: &str) -> Result<Vec<u8>, CryptoError> {
    PRIVATE_KEY_LABELS
        .iter()
        .find_map(|label| pem_to_der(pem, label))
        .ok_or_else(|| CryptoError::InvalidPem("no private key block".to_string()))
}

/// Returns the single-line base64 body of a PEM certificate.
///
/// This is the form published in `ds:X509Certificate` elements.
///
/// # Errors
///
/// Returns an error if no certificate block is present.
pub fn certificate_base64(pem: &str) -> Result<String, CryptoError> {
    let der = pem_to_der(pem, "CERTIFICATE")
        .ok_or_else(|| CryptoError::InvalidPem("no certificate block".to_string()))?;
    Ok(base64::engine::general_purpose::STANDARD.encode(der))
}
