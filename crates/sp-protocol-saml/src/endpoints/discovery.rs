//! Discovery service response endpoint.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::error_response;
use super::state::SpState;

/// Query parameters sent back by the discovery service.
#[derive(Debug, Deserialize)]
pub struct DiscoveryResponseParams {
    /// Parked state ID.
    #[serde(rename = "AuthID")]
    pub auth_id: String,
    /// Chosen IdP.
    #[serde(rename = "idpentityid")]
    pub idp_entity_id: String,
}

/// GET handler that resumes a parked authentication at the chosen IdP.
pub async fn sp_discovery_response(
    State(state): State<SpState>,
    Path(source): Path<String>,
    Query(params): Query<DiscoveryResponseParams>,
) -> Response {
    let message = state
        .source(&source)
        .and_then(|s| s.resume_discovery(&params.auth_id, &params.idp_entity_id));
    match message {
        Ok(message) => Redirect::to(&message.redirect_url).into_response(),
        Err(e) => error_response(&e),
    }
}
