//! The sequential worker loop and its handler seam.
//!
//! Messages are handled strictly one at a time: the next entry is not
//! touched until the current handler call has completed or failed, and
//! an entry is only acknowledged once it has been fully handled. Every
//! per-message failure is logged and dropped; nothing stops the loop.

use crate::config::ConsumerConfig;
use crate::consumer::{StreamConsumer, StreamMessage};
use crate::error::StreamError;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Handler invoked once per successfully parsed message.
///
/// # Example
///
/// ```rust,ignore
/// struct DispatchHandler { dispatcher: Arc<NotificationDispatcher> }
///
/// #[async_trait]
/// impl MessageHandler for DispatchHandler {
///     type Event = EventPayload;
///
///     async fn handle(&self, event: EventPayload) -> Result<(), StreamError> {
///         self.dispatcher.dispatch(&event).await.map_err(StreamError::handler)?;
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "NotificationDispatcher"
///     }
/// }
/// ```
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// The payload shape messages are parsed into.
    type Event: DeserializeOwned + Send + Sync;

    /// Process a single parsed event. An `Err` drops the message.
    async fn handle(&self, event: Self::Event) -> Result<(), StreamError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Outcome of turning a raw entry value into a typed event.
enum Decoded<E> {
    /// Absent or empty value, nothing to process.
    Skip,
    Event(E),
    Malformed(serde_json::Error),
}

fn decode<E: DeserializeOwned>(value: Option<String>) -> Decoded<E> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Decoded::Skip;
    };
    match serde_json::from_str(&value) {
        Ok(event) => Decoded::Event(event),
        Err(e) => Decoded::Malformed(e),
    }
}

/// Acknowledgment seam between the loop body and the stream.
#[async_trait]
trait Acknowledger: Send + Sync {
    async fn ack(&self, message_id: &str) -> Result<(), StreamError>;
}

#[async_trait]
impl Acknowledger for StreamConsumer {
    async fn ack(&self, message_id: &str) -> Result<(), StreamError> {
        StreamConsumer::ack(self, message_id).await
    }
}

/// Handle one entry end to end, then acknowledge it.
///
/// Every path acknowledges, including drops: a message is either
/// handled or gone, never redelivered.
async fn process_message<H: MessageHandler>(
    handler: &H,
    acker: &impl Acknowledger,
    message: StreamMessage,
) {
    let message_id = message.id;

    match decode::<H::Event>(message.value) {
        // Empty entries are skipped without logging.
        Decoded::Skip => {}
        Decoded::Malformed(e) => {
            error!(
                message_id = %message_id,
                error = %e,
                "Failed to parse message, dropping"
            );
        }
        Decoded::Event(event) => {
            if let Err(e) = handler.handle(event).await {
                error!(
                    message_id = %message_id,
                    error = %e,
                    "Handler failed, dropping message"
                );
            }
        }
    }

    if let Err(e) = acker.ack(&message_id).await {
        error!(message_id = %message_id, error = %e, "Failed to ACK message");
    }
}

/// Sequential stream worker feeding parsed messages into a handler.
pub struct StreamWorker<H: MessageHandler> {
    consumer: StreamConsumer,
    handler: H,
}

impl<H: MessageHandler> StreamWorker<H> {
    pub fn new(redis: ConnectionManager, handler: H, config: ConsumerConfig) -> Self {
        Self {
            consumer: StreamConsumer::new(redis, config),
            handler,
        }
    }

    /// Run the worker loop until the shutdown flag flips.
    pub async fn run(&self, shutdown: watch::Receiver<bool>) -> Result<(), StreamError> {
        let config = self.consumer.config();
        info!(
            consumer_id = %config.consumer_id,
            stream = %config.stream_name,
            group = %config.consumer_group,
            handler = %self.handler.name(),
            "Starting stream worker"
        );

        self.consumer.ensure_consumer_group().await?;

        let mut consecutive_errors: u32 = 0;
        const MAX_BACKOFF_SECS: u64 = 30;

        loop {
            if *shutdown.borrow() {
                info!("Received shutdown signal, stopping worker");
                break;
            }

            let messages = match self.consumer.read_new().await {
                Ok(messages) => {
                    if consecutive_errors > 0 {
                        info!("Connection recovered after {} errors", consecutive_errors);
                        consecutive_errors = 0;
                    }
                    messages
                }
                Err(e) => {
                    consecutive_errors += 1;

                    if e.is_nogroup_error() {
                        warn!("Consumer group missing, recreating...");
                        if let Err(create_err) = self.consumer.ensure_consumer_group().await {
                            error!(error = %create_err, "Failed to recreate consumer group");
                        }
                    } else if e.is_connection_error() {
                        let backoff_secs =
                            std::cmp::min(2u64.pow(consecutive_errors.min(5)), MAX_BACKOFF_SECS);
                        warn!(
                            error = %e,
                            consecutive_errors = %consecutive_errors,
                            backoff_secs = %backoff_secs,
                            "Redis connection error, backing off"
                        );
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                    } else {
                        error!(error = %e, "Error reading from stream");
                    }

                    tokio::time::sleep(Duration::from_secs(1)).await;
                    continue;
                }
            };

            for message in messages {
                process_message(&self.handler, &self.consumer, message).await;
            }
        }

        info!("Stream worker stopped");
        Ok(())
    }
}
