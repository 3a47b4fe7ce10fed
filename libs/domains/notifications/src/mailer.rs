//! Assembles the mail for an event and hands it to the transport.

use crate::error::NotificationResult;
use crate::event::{EventPayload, EventType};
use crate::templates::TemplateRenderer;
use crate::transport::{MailTransport, OutgoingMail, SentMail};
use std::sync::Arc;

/// Subject line for an event, with the video title interpolated.
pub fn subject_for(event: &EventPayload) -> String {
    let title = event.video_title();
    match event.event_type {
        EventType::VideoProcessed => format!("Seu vídeo \"{title}\" foi processado"),
        EventType::VideoFailed => format!("Falha no processamento do vídeo \"{title}\""),
    }
}

/// Renders the template for an event and sends the result.
pub struct Mailer {
    renderer: TemplateRenderer,
    transport: Arc<dyn MailTransport>,
}

impl Mailer {
    pub fn new(renderer: TemplateRenderer, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            renderer,
            transport,
        }
    }

    pub async fn send_for_event(&self, event: &EventPayload) -> NotificationResult<SentMail> {
        let html_body = self.renderer.render_for_event(event).await?;
        self.transport
            .send(OutgoingMail {
                to: event.user.email.clone(),
                subject: subject_for(event),
                html_body,
            })
            .await
    }
}
