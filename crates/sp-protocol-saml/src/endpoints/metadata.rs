//! Hosted metadata endpoint.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use super::error_response;
use super::state::SpState;

/// Media type of SAML metadata documents.
pub const METADATA_CONTENT_TYPE: &str = "application/samlmetadata+xml";

/// GET handler for the hosted metadata of a source.
pub async fn sp_metadata(State(state): State<SpState>, Path(source): Path<String>) -> Response {
    let document = state.source(&source).and_then(|s| s.hosted_metadata());
    match document {
        Ok(document) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, METADATA_CONTENT_TYPE)],
            document.to_xml(),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}
