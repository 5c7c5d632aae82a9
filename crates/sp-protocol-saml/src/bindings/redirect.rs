//! HTTP-Redirect Binding implementation.

use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::{Read, Write};

use crate::error::{SamlError, SamlResult};
use crate::signature::MessageSigner;

use super::SamlMessageType;

/// HTTP-Redirect binding encoder/decoder.
pub struct HttpRedirectBinding;

impl HttpRedirectBinding {
    /// Encodes a request as a redirect URL, signed over the query string.
    ///
    /// `xml` must not carry an enveloped signature.
    ///
    /// # Errors
    ///
    /// Returns an error if compression or signing fails.
    pub fn encode_request(
        xml: &str,
        destination: &str,
        relay_state: Option<&str>,
        signer: &dyn MessageSigner,
    ) -> SamlResult<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(deflate_compress(xml.as_bytes())?);

        let mut query = format!(
            "{}={}",
            SamlMessageType::Request.param(),
            urlencoding::encode(&encoded)
        );
        if let Some(rs) = relay_state {
            query.push_str(&format!("&RelayState={}", urlencoding::encode(rs)));
        }
        let query = signer.sign_redirect_query(&query)?;

        let separator = if destination.contains('?') { '&' } else { '?' };
        Ok(format!("{destination}{separator}{query}"))
    }

    /// Decodes the message carried by a redirect URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL carries no decodable message.
    pub fn decode_url(url: &str) -> SamlResult<DecodedMessage> {
        let parsed = url::Url::parse(url).map_err(|_| SamlError::InvalidUrl(url.to_string()))?;

        let mut message = None;
        let mut decoded = DecodedMessage::default();
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "SAMLRequest" => message = Some((value.into_owned(), SamlMessageType::Request)),
                "SAMLResponse" => message = Some((value.into_owned(), SamlMessageType::Response)),
                "RelayState" => decoded.relay_state = Some(value.into_owned()),
                "SigAlg" => decoded.sig_alg = Some(value.into_owned()),
                "Signature" => decoded.signature = Some(value.into_owned()),
                _ => {}
            }
        }

        let (encoded, message_type) = message
            .ok_or_else(|| SamlError::XmlParse("no SAMLRequest or SAMLResponse parameter".to_string()))?;
        let compressed = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| SamlError::XmlParse(format!("base64: {e}")))?;
        decoded.xml = String::from_utf8(deflate_decompress(&compressed)?)
            .map_err(|e| SamlError::XmlParse(format!("invalid UTF-8 in message: {e}")))?;
        decoded.message_type = Some(message_type);
        Ok(decoded)
    }

    /// Returns the signed part of a redirect URL's query string, as sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL has no signature.
    pub fn signed_query(url: &str) -> SamlResult<&str> {
        let query = url
            .split_once('?')
            .map(|(_, q)| q)
            .ok_or_else(|| SamlError::InvalidUrl(url.to_string()))?;
        let start = query
            .find("SAMLRequest=")
            .or_else(|| query.find("SAMLResponse="))
            .ok_or_else(|| SamlError::XmlParse("no SAML message parameter".to_string()))?;
        let end = query
            .find("&Signature=")
            .ok_or_else(|| SamlError::XmlParse("unsigned message".to_string()))?;
        Ok(&query[start..end])
    }
}

/// Decoded redirect binding message.
#[derive(Debug, Clone, Default)]
pub struct DecodedMessage {
    /// The inflated XML message.
    pub xml: String,
    /// Request or response.
    pub message_type: Option<SamlMessageType>,
    /// The RelayState if present.
    pub relay_state: Option<String>,
    /// The base64 detached signature.
    pub signature: Option<String>,
    /// The signature algorithm URI.
    pub sig_alg: Option<String>,
}

/// Compresses data using DEFLATE (raw, no zlib header).
fn deflate_compress(data: &[u8]) -> SamlResult<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| SamlError::Deflate(format!("Compression error: {e}")))?;
    encoder
        .finish()
        .map_err(|e| SamlError::Deflate(format!("Compression finish error: {e}")))
}

/// Decompresses DEFLATE data.
fn deflate_decompress(data: &[u8]) -> SamlResult<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| SamlError::Deflate(format!("Decompression error: {e}")))?;
    Ok(decompressed)
}
