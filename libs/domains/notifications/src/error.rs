//! Error types for the notifications domain.

use std::fmt;
use thiserror::Error;

/// Result type for notification operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// A single failed validation rule.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Structural validation failure of an event payload.
///
/// Carries every violated rule so callers can report them all at once.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "payload validation failed:")?;
        for (i, e) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ' ' } else { ';' };
            write!(f, "{}{} {}", sep, e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors that can occur in the notifications domain.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Event payload failed structural validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Template file missing or unreadable.
    #[error("Template '{name}' could not be loaded: {source}")]
    TemplateLoad {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Template compilation or rendering error.
    #[error("Template error: {0}")]
    Template(String),

    /// SMTP-level failure.
    #[error("Mail transport error: {0}")]
    MailTransport(String),
}

impl From<handlebars::TemplateError> for NotificationError {
    fn from(err: handlebars::TemplateError) -> Self {
        NotificationError::Template(err.to_string())
    }
}

impl From<handlebars::RenderError> for NotificationError {
    fn from(err: handlebars::RenderError) -> Self {
        NotificationError::Template(err.to_string())
    }
}

impl From<lettre::error::Error> for NotificationError {
    fn from(err: lettre::error::Error) -> Self {
        NotificationError::MailTransport(err.to_string())
    }
}

impl From<lettre::address::AddressError> for NotificationError {
    fn from(err: lettre::address::AddressError) -> Self {
        NotificationError::MailTransport(format!("invalid address: {}", err))
    }
}

impl From<lettre::transport::smtp::Error> for NotificationError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        NotificationError::MailTransport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_lists_fields() {
        let err = ValidationError {
            errors: vec![
                FieldError {
                    field: "eventId",
                    message: "must not be empty",
                },
                FieldError {
                    field: "user.email",
                    message: "must be a valid email address",
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("eventId"));
        assert!(text.contains("user.email"));
    }

    #[test]
    fn test_template_load_error_names_template() {
        let err = NotificationError::TemplateLoad {
            name: "video_processed".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("video_processed"));
    }
}
