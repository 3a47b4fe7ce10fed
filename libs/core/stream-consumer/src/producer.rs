//! Stream producer for publishing events.
//!
//! Counterpart of [`StreamConsumer`](crate::StreamConsumer): entries
//! carry the serialized event in a `value` field.

use crate::error::StreamError;
use redis::aio::ConnectionManager;
use serde::Serialize;
use tracing::debug;

/// Publishes events onto one stream.
#[derive(Clone)]
pub struct StreamProducer {
    redis: ConnectionManager,
    stream_name: String,
    max_length: i64,
}

impl StreamProducer {
    pub fn new(redis: ConnectionManager, stream_name: impl Into<String>) -> Self {
        Self {
            redis,
            stream_name: stream_name.into(),
            max_length: 100_000,
        }
    }

    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    /// Publish a serializable event. Returns the stream entry ID.
    pub async fn send<T: Serialize>(&self, event: &T) -> Result<String, StreamError> {
        let json = serde_json::to_string(event)?;
        self.send_raw(&json).await
    }

    /// Publish a raw value without serialization.
    ///
    /// Used by tooling and tests that need to put arbitrary (including
    /// malformed) payloads on the stream.
    pub async fn send_raw(&self, value: &str) -> Result<String, StreamError> {
        let mut conn = self.redis.clone();

        // MAXLEN ~ keeps trimming approximate and cheap.
        let entry_id: String = redis::cmd("XADD")
            .arg(&self.stream_name)
            .arg("MAXLEN")
            .arg("~")
            .arg(self.max_length)
            .arg("*")
            .arg("value")
            .arg(value)
            .query_async(&mut conn)
            .await?;

        debug!(
            stream = %self.stream_name,
            entry_id = %entry_id,
            "Published event"
        );

        Ok(entry_id)
    }
}
