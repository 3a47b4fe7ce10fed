//! Entry point of the dispatch pipeline and its stream-handler shim.

use crate::error::NotificationResult;
use crate::event::EventPayload;
use crate::mailer::Mailer;
use crate::transport::SentMail;
use async_trait::async_trait;
use std::sync::Arc;
use stream_consumer::{MessageHandler, StreamError};
use tracing::info;

/// Validates an event and turns it into a delivered mail.
///
/// Shared by both ingress paths; constructed once at startup and handed
/// out behind an [`Arc`].
pub struct NotificationDispatcher {
    mailer: Mailer,
}

impl NotificationDispatcher {
    pub fn new(mailer: Mailer) -> Self {
        Self { mailer }
    }

    pub async fn dispatch(&self, event: &EventPayload) -> NotificationResult<SentMail> {
        event.validate()?;

        info!(
            event_id = %event.event_id,
            event_type = %event.event_type,
            to = %event.user.email,
            "Dispatching notification"
        );

        self.mailer.send_for_event(event).await
    }
}

/// Adapts the dispatcher to the stream-consumer handler trait.
///
/// Any dispatch failure, validation included, surfaces as a handler
/// error; the worker logs it and drops the message.
pub struct DispatchHandler {
    dispatcher: Arc<NotificationDispatcher>,
}

impl DispatchHandler {
    pub fn new(dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl MessageHandler for DispatchHandler {
    type Event = EventPayload;

    async fn handle(&self, event: EventPayload) -> Result<(), StreamError> {
        self.dispatcher
            .dispatch(&event)
            .await
            .map(|_| ())
            .map_err(|e| StreamError::handler(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "notification-dispatch"
    }
}
