//! Audit events for SP authentication flows.
//!
//! Events are built with [`AuthEvent::builder`] and written to the `audit`
//! tracing target by [`AuthEvent::emit`]. Each event carries:
//! - Timestamp (ISO 8601)
//! - Event type
//! - Authentication source ID
//! - Outcome (success/failure)
//! - Free-form details, such as the IdP entity ID

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEventType {
    /// Authentication request handed to the transport.
    AuthnRequestSent,
    /// User sent to a discovery service.
    DiscoveryRedirect,
    /// Discovery service answered with an IdP choice.
    DiscoveryResponse,
    /// No IdP could satisfy the request.
    NoSupportedIdp,
    /// Fixed IdP is outside the permitted set.
    NoAvailableIdp,
    /// Logout request handed to the transport.
    LogoutRequestSent,
    /// Hosted metadata generated.
    MetadataGenerated,
}

impl AuthEventType {
    /// Returns the wire name of this event type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthnRequestSent => "AUTHN_REQUEST_SENT",
            Self::DiscoveryRedirect => "DISCOVERY_REDIRECT",
            Self::DiscoveryResponse => "DISCOVERY_RESPONSE",
            Self::NoSupportedIdp => "NO_SUPPORTED_IDP",
            Self::NoAvailableIdp => "NO_AVAILABLE_IDP",
            Self::LogoutRequestSent => "LOGOUT_REQUEST_SENT",
            Self::MetadataGenerated => "METADATA_GENERATED",
        }
    }
}

/// Outcome of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// An audit event emitted by an authentication source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEvent {
    /// Unique event identifier.
    pub id: Uuid,

    /// Timestamp of the event (ISO 8601).
    pub timestamp: DateTime<Utc>,

    /// Type of event.
    pub event_type: AuthEventType,

    /// Outcome of the event.
    pub outcome: EventOutcome,

    /// Authentication source that produced the event.
    pub source_id: Option<String>,

    /// Error message (for failure events).
    pub error: Option<String>,

    /// Additional details as key-value pairs.
    pub details: Vec<(String, String)>,
}

impl AuthEvent {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(event_type: AuthEventType) -> AuthEventBuilder {
        AuthEventBuilder::new(event_type)
    }

    /// Returns the value of a detail, if present.
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Writes the event to the `audit` tracing target.
    pub fn emit(&self) {
        let details = self
            .details
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ");
        let source = self.source_id.as_deref().unwrap_or("-");

        match self.outcome {
            EventOutcome::Success => tracing::info!(
                target: "audit",
                event_id = %self.id,
                event_type = self.event_type.as_str(),
                source,
                details,
                "auth event"
            ),
            EventOutcome::Failure => tracing::warn!(
                target: "audit",
                event_id = %self.id,
                event_type = self.event_type.as_str(),
                source,
                error = self.error.as_deref().unwrap_or(""),
                details,
                "auth event failed"
            ),
        }
    }
}

/// Builder for creating events.
pub struct AuthEventBuilder {
    event_type: AuthEventType,
    outcome: EventOutcome,
    source_id: Option<String>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl AuthEventBuilder {
    /// Creates a new event builder.
    #[must_use]
    pub const fn new(event_type: AuthEventType) -> Self {
        Self {
            event_type,
            outcome: EventOutcome::Success,
            source_id: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the outcome to failure with an error message.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = EventOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the authentication source ID.
    #[must_use]
    pub fn source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Adds a detail key-value pair.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> AuthEvent {
        AuthEvent {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            event_type: self.event_type,
            outcome: self.outcome,
            source_id: self.source_id,
            error: self.error,
            details: self.details,
        }
    }

    /// Builds and emits the event.
    pub fn emit(self) -> AuthEvent {
        let event = self.build();
        event.emit();
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_creates_success_event() {
        let event = AuthEvent::builder(AuthEventType::AuthnRequestSent)
            .source("default-sp")
            .detail("idp", "https://idp.example.org")
            .build();

        assert_eq!(event.event_type, AuthEventType::AuthnRequestSent);
        assert_eq!(event.outcome, EventOutcome::Success);
        assert_eq!(event.source_id.as_deref(), Some("default-sp"));
        assert_eq!(event.detail("idp"), Some("https://idp.example.org"));
        assert!(event.error.is_none());
    }

    #[test]
    fn builder_creates_failure_event() {
        let event = AuthEvent::builder(AuthEventType::NoSupportedIdp)
            .failure("no candidate")
            .emit();

        assert_eq!(event.outcome, EventOutcome::Failure);
        assert_eq!(event.error.as_deref(), Some("no candidate"));
    }

    #[test]
    fn event_type_wire_name() {
        assert_eq!(AuthEventType::NoAvailableIdp.as_str(), "NO_AVAILABLE_IDP");
        assert_eq!(AuthEventType::DiscoveryRedirect.as_str(), "DISCOVERY_REDIRECT");
    }

    #[test]
    fn event_has_timestamp() {
        let before = Utc::now();
        let event = AuthEvent::builder(AuthEventType::MetadataGenerated).build();
        let after = Utc::now();

        assert!(event.timestamp >= before);
        assert!(event.timestamp <= after);
    }
}
