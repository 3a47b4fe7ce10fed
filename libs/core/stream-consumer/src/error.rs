//! Stream consumption error types.

use thiserror::Error;

/// Errors surfaced while reading from or acknowledging a stream.
#[derive(Error, Debug)]
pub enum StreamError {
    /// Redis connection or command error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Message value is not parseable as the expected payload shape
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The handler rejected or failed to process the message
    #[error("Handler error: {0}")]
    Handler(String),
}

impl StreamError {
    /// Create a handler error from any displayable cause.
    pub fn handler(message: impl Into<String>) -> Self {
        StreamError::Handler(message.into())
    }

    /// The consumer group vanished and must be recreated.
    pub fn is_nogroup_error(&self) -> bool {
        matches!(self, StreamError::Redis(e) if e.to_string().contains("NOGROUP"))
    }

    /// Connection-level failure that warrants a backoff before retrying the read.
    pub fn is_connection_error(&self) -> bool {
        let StreamError::Redis(e) = self else {
            return false;
        };
        let lower = e.to_string().to_lowercase();
        lower.contains("connection")
            || lower.contains("disconnected")
            || lower.contains("broken pipe")
            || lower.contains("reset by peer")
            || lower.contains("refused")
            || lower.contains("timed out")
            || lower.contains("eof")
            || lower.contains("io error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_display() {
        let err = StreamError::handler("mail transport unavailable");
        assert_eq!(err.to_string(), "Handler error: mail transport unavailable");
    }

    #[test]
    fn test_malformed_from_serde() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = StreamError::from(parse_err);
        assert!(matches!(err, StreamError::Malformed(_)));
        assert!(!err.is_connection_error());
        assert!(!err.is_nogroup_error());
    }
}
