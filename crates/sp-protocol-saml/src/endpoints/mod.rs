//! Axum HTTP handlers for the SP endpoints.
//!
//! - **Metadata** - publishes the hosted SP metadata
//! - **Login** - starts an authentication at a source
//! - **Discovery response** - resumes a parked authentication with the chosen IdP
//!
//! ```rust,ignore
//! use sp_protocol_saml::endpoints::{sp_router, SpState};
//!
//! let app = axum::Router::new().merge(sp_router()).with_state(SpState::new(sources));
//! ```

mod discovery;
mod login;
mod metadata;
mod router;
mod state;

pub use discovery::*;
pub use login::*;
pub use metadata::*;
pub use router::*;
pub use state::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::SamlError;

fn error_response(err: &SamlError) -> Response {
    let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    } else {
        tracing::debug!(error = %err, "request rejected");
    }
    (status, err.to_string()).into_response()
}
