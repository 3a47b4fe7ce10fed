//! Consumer configuration.

use uuid::Uuid;

fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Configuration for a stream consumer.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Redis stream name (the subscribed topic).
    pub stream_name: String,
    /// Consumer group name.
    pub consumer_group: String,
    /// Unique consumer ID within the group.
    pub consumer_id: String,
    /// Maximum entries fetched per read.
    pub batch_size: usize,
    /// Blocking read timeout in milliseconds. Bounds shutdown latency.
    pub block_timeout_ms: u64,
}

impl ConsumerConfig {
    /// Create a config with explicit stream and group names.
    pub fn new(stream_name: impl Into<String>, consumer_group: impl Into<String>) -> Self {
        Self {
            stream_name: stream_name.into(),
            consumer_group: consumer_group.into(),
            consumer_id: format!("consumer-{}", Uuid::new_v4()),
            batch_size: 10,
            block_timeout_ms: 5000,
        }
    }

    /// Read stream and group names from the environment.
    ///
    /// - `EVENT_TOPIC`: stream name (default `video-events`)
    /// - `EVENT_CONSUMER_GROUP`: consumer group (default `notification-service`)
    pub fn from_env() -> Self {
        Self::new(
            env_or_default("EVENT_TOPIC", "video-events"),
            env_or_default("EVENT_CONSUMER_GROUP", "notification-service"),
        )
    }

    /// Set the consumer ID.
    pub fn with_consumer_id(mut self, id: impl Into<String>) -> Self {
        self.consumer_id = id.into();
        self
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the blocking read timeout.
    pub fn with_block_timeout_ms(mut self, timeout: u64) -> Self {
        self.block_timeout_ms = timeout;
        self
    }
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self::new("video-events", "notification-service")
    }
}
