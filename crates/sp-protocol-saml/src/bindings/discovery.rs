//! IdP discovery protocol redirect.

use url::Url;

use crate::error::{SamlError, SamlResult};

/// Query parameter the discovery service uses to return the chosen IdP.
pub const RETURN_ID_PARAM: &str = "idpentityid";

/// A redirect to a discovery service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRedirect {
    /// The full redirect URL.
    pub url: String,
    /// Identifier of the saved authentication state.
    pub state_id: String,
    /// The IdPs the user may choose from; empty means any.
    pub candidates: Vec<String>,
}

/// Builds the discovery service URL.
///
/// # Errors
///
/// Returns [`SamlError::InvalidUrl`] unless `disco_url` is an absolute HTTP(S) URL.
pub fn discovery_url(
    disco_url: &str,
    entity_id: &str,
    return_url: &str,
    candidates: &[String],
) -> SamlResult<String> {
    let mut url = Url::parse(disco_url).map_err(|_| SamlError::InvalidUrl(disco_url.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SamlError::InvalidUrl(disco_url.to_string()));
    }

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("entityID", entity_id)
            .append_pair("return", return_url)
            .append_pair("returnIDParam", RETURN_ID_PARAM);
        for idp in candidates {
            query.append_pair("IDPList[]", idp);
        }
    }
    Ok(url.into())
}
