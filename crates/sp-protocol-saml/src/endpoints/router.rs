//! SP router configuration.

use axum::{routing::get, Router};

use super::discovery::sp_discovery_response;
use super::login::sp_login;
use super::metadata::sp_metadata;
use super::state::SpState;

/// Creates the SP router.
///
/// | Method | Path                            | Handler                 |
/// |--------|---------------------------------|-------------------------|
/// | GET    | `/saml/sp/metadata/{source}`    | `sp_metadata`           |
/// | GET    | `/saml/sp/login/{source}`       | `sp_login`              |
/// | GET    | `/saml/sp/discoresp/{source}`   | `sp_discovery_response` |
pub fn sp_router() -> Router<SpState> {
    Router::new()
        .route("/saml/sp/metadata/{source}", get(sp_metadata))
        .route("/saml/sp/login/{source}", get(sp_login))
        .route("/saml/sp/discoresp/{source}", get(sp_discovery_response))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::auth_source::SpAuthSource;
    use crate::endpoints::METADATA_CONTENT_TYPE;
    use crate::lookup::InMemoryMetadataStore;
    use crate::types::{IdpMetadata, SamlBinding};
    use sp_core::{GlobalConfig, SpConfig};

    fn app() -> Router {
        let store = InMemoryMetadataStore::new();
        for idp in ["https://idp1.example.org", "https://idp2.example.org"] {
            store.insert(IdpMetadata::new(idp).with_sso(SamlBinding::HttpRedirect, format!("{idp}/sso")));
        }
        let source = SpAuthSource::new(
            "default-sp",
            SpConfig::new("https://sp.example.org/sp"),
            Arc::new(GlobalConfig::default()),
            Arc::new(store),
        )
        .unwrap();
        let sources = BTreeMap::from([("default-sp".to_string(), Arc::new(source))]);
        sp_router().with_state(SpState::new(sources))
    }

    async fn get(uri: &str) -> axum::response::Response {
        app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn serves_metadata() {
        let response = get("/saml/sp/metadata/default-sp").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], METADATA_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn unknown_source_is_not_found() {
        let response = get("/saml/sp/metadata/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn login_redirects_to_idp() {
        let response = get("/saml/sp/login/default-sp?idp=https%3A%2F%2Fidp1.example.org").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("https://idp1.example.org/sso?SAMLRequest="));
    }

    #[tokio::test]
    async fn unknown_idp_list_is_bad_request() {
        let response = get("/saml/sp/login/default-sp?IDPList=urn%3Anobody").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stale_discovery_response_is_rejected() {
        let response =
            get("/saml/sp/discoresp/default-sp?AuthID=gone&idpentityid=https%3A%2F%2Fidp1.example.org").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
