//! Domain event payload and its validation rules.
//!
//! Both ingress paths (HTTP endpoint and broker subscription) produce
//! the same [`EventPayload`]; [`EventPayload::validate`] is the shared
//! gate in front of the dispatcher.

use crate::error::{FieldError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of notification-worthy event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    VideoProcessed,
    VideoFailed,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::VideoProcessed => write!(f, "VIDEO_PROCESSED"),
            EventType::VideoFailed => write!(f, "VIDEO_FAILED"),
        }
    }
}

/// Recipient of the notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
}

/// One unit of work for the dispatch pipeline.
///
/// `data` is an open key/value map; only `videoTitle` is consumed and
/// its absence is tolerated (renders as an empty substitution).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub event_id: String,
    pub event_type: EventType,
    pub timestamp: String,
    pub user: User,
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl EventPayload {
    /// The `videoTitle` entry of `data`, or empty when absent.
    pub fn video_title(&self) -> &str {
        self.data
            .get("videoTitle")
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    /// Field-level rules shared by both ingress paths.
    ///
    /// Membership of `eventType` and `data` being an object are already
    /// enforced by deserialization; everything else is checked here and
    /// reported per field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if self.event_id.trim().is_empty() {
            errors.push(FieldError {
                field: "eventId",
                message: "must not be empty",
            });
        }
        if self.timestamp.trim().is_empty() {
            errors.push(FieldError {
                field: "timestamp",
                message: "must not be empty",
            });
        }
        if self.user.id.trim().is_empty() {
            errors.push(FieldError {
                field: "user.id",
                message: "must not be empty",
            });
        }
        if self.user.email.parse::<lettre::Address>().is_err() {
            errors.push(FieldError {
                field: "user.email",
                message: "must be a valid email address",
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors })
        }
    }
}
