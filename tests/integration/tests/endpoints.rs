//! The axum router driven through `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use tower::ServiceExt;

use crate::common::{TestEnv, IDP1, IDP2};

async fn get(env: &TestEnv, uri: &str) -> anyhow::Result<Response> {
    Ok(env
        .router()
        .oneshot(Request::get(uri).body(Body::empty())?)
        .await?)
}

fn location(response: &Response) -> anyhow::Result<String> {
    Ok(response
        .headers()
        .get(header::LOCATION)
        .ok_or_else(|| anyhow::anyhow!("no Location header"))?
        .to_str()?
        .to_string())
}

#[tokio::test]
async fn metadata_is_served_as_saml_metadata() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let response = get(&env, "/saml/sp/metadata/default-sp").await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/samlmetadata+xml"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    let body = String::from_utf8(body.to_vec())?;
    assert!(body.starts_with("<?xml"));
    assert!(body.contains("<md:SPSSODescriptor"));
    assert!(body.contains(r#"Location="https://sp.example.org/saml/sp/acs/default-sp""#));
    Ok(())
}

#[tokio::test]
async fn unknown_source_is_not_found() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let response = get(&env, "/saml/sp/metadata/missing").await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn discovery_round_trip() -> anyhow::Result<()> {
    let env = TestEnv::new()?;

    let response = get(&env, "/saml/sp/login/scoped-sp?RelayState=%2Fhome").await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let disco = url::Url::parse(&location(&response)?)?;
    assert_eq!(disco.path(), "/saml/disco");

    let return_url = disco
        .query_pairs()
        .find(|(k, _)| k == "return")
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| anyhow::anyhow!("no return parameter"))?;
    let mut back = url::Url::parse(&return_url)?;
    back.query_pairs_mut().append_pair("idpentityid", IDP2);

    let response = get(&env, &format!("{}?{}", back.path(), back.query().unwrap_or_default())).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let idp = location(&response)?;
    assert!(idp.starts_with(&format!("{IDP2}/sso?SAMLRequest=")));
    assert!(idp.contains("RelayState=%2Fhome"));
    Ok(())
}

#[tokio::test]
async fn login_with_fixed_idp_goes_straight_to_idp() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let response = get(&env, "/saml/sp/login/fixed-sp").await?;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response)?.starts_with(&format!("{IDP1}/sso?SAMLRequest=")));
    Ok(())
}
