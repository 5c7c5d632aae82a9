//! Login endpoint.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::error_response;
use super::state::SpState;
use crate::auth_source::AuthnOutcome;
use crate::state::RuntimeState;

/// Query parameters of the login endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    /// IdP to use for this attempt.
    pub idp: Option<String>,
    /// Space separated list of acceptable IdPs.
    #[serde(rename = "IDPList")]
    pub idp_list: Option<String>,
    /// Request a fresh authentication.
    #[serde(rename = "ForceAuthn", default)]
    pub force_authn: bool,
    /// Opaque value to get back with the response.
    #[serde(rename = "RelayState")]
    pub relay_state: Option<String>,
}

impl From<LoginParams> for RuntimeState {
    fn from(params: LoginParams) -> Self {
        let mut state = Self::new();
        state.idp = params.idp;
        if let Some(list) = params.idp_list {
            state.idp_list = list.split_whitespace().map(str::to_string).collect();
        }
        state.force_authn = params.force_authn;
        state.relay_state = params.relay_state;
        state
    }
}

/// GET handler that starts an authentication and redirects the browser.
pub async fn sp_login(
    State(state): State<SpState>,
    Path(source): Path<String>,
    Query(params): Query<LoginParams>,
) -> Response {
    let outcome = state
        .source(&source)
        .and_then(|s| s.authenticate(params.into()));
    match outcome {
        Ok(AuthnOutcome::Request(message)) => Redirect::to(&message.redirect_url).into_response(),
        Ok(AuthnOutcome::Discovery(discovery)) => Redirect::to(&discovery.url).into_response(),
        Err(e) => error_response(&e),
    }
}
