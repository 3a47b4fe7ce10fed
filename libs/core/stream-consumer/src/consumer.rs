//! Stream consumer for Redis operations
//!
//! Handles reading messages from a Redis stream using a consumer group.

use crate::config::ConsumerConfig;
use crate::error::StreamError;
use redis::aio::ConnectionManager;
use redis::RedisResult;
use tracing::{debug, info};

/// One entry pulled from the stream.
///
/// `value` is the `value` field of the entry, when present. Entries
/// without it carry nothing to process.
#[derive(Debug, Clone)]
pub struct StreamMessage {
    pub id: String,
    pub value: Option<String>,
}

type RawStreams = Vec<(String, Vec<(String, Vec<(String, String)>)>)>;

/// Reads entries from one stream under one consumer group.
pub struct StreamConsumer {
    redis: ConnectionManager,
    config: ConsumerConfig,
}

impl StreamConsumer {
    pub fn new(redis: ConnectionManager, config: ConsumerConfig) -> Self {
        Self { redis, config }
    }

    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    /// Create the consumer group at the current end of the stream.
    ///
    /// The group starts at `$` so only entries produced after
    /// subscription are delivered, never history.
    pub async fn ensure_consumer_group(&self) -> Result<(), StreamError> {
        let mut conn = self.redis.clone();

        let result: RedisResult<()> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg("$")
            .arg("MKSTREAM")
            .query_async(&mut conn)
            .await;

        match result {
            Ok(_) => {
                info!(
                    stream = %self.config.stream_name,
                    group = %self.config.consumer_group,
                    "Created consumer group"
                );
                Ok(())
            }
            Err(e) if e.to_string().contains("BUSYGROUP") => {
                debug!(
                    stream = %self.config.stream_name,
                    group = %self.config.consumer_group,
                    "Consumer group already exists"
                );
                Ok(())
            }
            Err(e) => Err(StreamError::Redis(e)),
        }
    }

    /// Read the next batch of new entries, blocking up to the
    /// configured timeout when the stream is idle.
    pub async fn read_new(&self) -> Result<Vec<StreamMessage>, StreamError> {
        let mut conn = self.redis.clone();

        let result: RedisResult<Option<RawStreams>> = redis::cmd("XREADGROUP")
            .arg("GROUP")
            .arg(&self.config.consumer_group)
            .arg(&self.config.consumer_id)
            .arg("BLOCK")
            .arg(self.config.block_timeout_ms)
            .arg("COUNT")
            .arg(self.config.batch_size)
            .arg("STREAMS")
            .arg(&self.config.stream_name)
            .arg(">")
            .query_async(&mut conn)
            .await;

        match result {
            Ok(Some(streams)) => Ok(streams
                .into_iter()
                .flat_map(|(_, entries)| entries)
                .map(|(id, fields)| StreamMessage {
                    id,
                    value: message_value(fields),
                })
                .collect()),
            // Blocking timeout elapsed with nothing to deliver.
            Ok(None) => Ok(vec![]),
            Err(e) => Err(StreamError::Redis(e)),
        }
    }

    /// Acknowledge a fully handled entry, advancing this consumer's position.
    pub async fn ack(&self, message_id: &str) -> Result<(), StreamError> {
        let mut conn = self.redis.clone();

        let _: i64 = redis::cmd("XACK")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg(message_id)
            .query_async(&mut conn)
            .await?;

        debug!(message_id = %message_id, "Acknowledged message");
        Ok(())
    }
}

/// Extract the `value` field from an entry's field list.
fn message_value(fields: Vec<(String, String)>) -> Option<String> {
    fields.into_iter().find(|(k, _)| k == "value").map(|(_, v)| v)
}
