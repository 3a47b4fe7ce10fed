//! End-to-end dispatch pipeline tests with a recording transport.

use async_trait::async_trait;
use domain_notifications::{
    Mailer, MailTransport, NotificationDispatcher, NotificationError, NotificationResult,
    OutgoingMail, SentMail, TemplateCache, TemplateRenderer,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

struct RecordingTransport {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, mail: OutgoingMail) -> NotificationResult<SentMail> {
        let receipt = SentMail {
            to: mail.to.clone(),
            subject: mail.subject.clone(),
        };
        self.sent.lock().unwrap().push(mail);
        Ok(receipt)
    }
}

fn temp_templates_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("notify-dispatch-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("video_processed.hbs"),
        "<h1>Olá, {{user.name}}!</h1><p>Seu vídeo \"{{data.videoTitle}}\" está pronto.</p>",
    )
    .unwrap();
    std::fs::write(
        dir.join("video_failed.hbs"),
        "<h1>Olá, {{user.name}}</h1><p>O vídeo \"{{data.videoTitle}}\" não pôde ser processado.</p>",
    )
    .unwrap();
    dir
}

fn pipeline(dir: &PathBuf) -> (NotificationDispatcher, Arc<RecordingTransport>) {
    let transport = RecordingTransport::new();
    let renderer = TemplateRenderer::new(dir, TemplateCache::new());
    let mailer = Mailer::new(renderer, transport.clone());
    (NotificationDispatcher::new(mailer), transport)
}

fn event(event_type: &str) -> domain_notifications::EventPayload {
    serde_json::from_value(json!({
        "eventId": "evt-1",
        "eventType": event_type,
        "timestamp": "2024-01-01T00:00:00Z",
        "user": { "id": "u1", "name": "Maria", "email": "maria@example.com" },
        "data": { "videoTitle": "Aula de Rust" }
    }))
    .unwrap()
}

#[tokio::test]
async fn test_processed_event_sends_success_mail() {
    let dir = temp_templates_dir();
    let (dispatcher, transport) = pipeline(&dir);

    let receipt = dispatcher.dispatch(&event("VIDEO_PROCESSED")).await.unwrap();

    assert_eq!(receipt.to, "maria@example.com");
    assert_eq!(receipt.subject, "Seu vídeo \"Aula de Rust\" foi processado");

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].html_body.contains("Olá, Maria!"));
    assert!(sent[0].html_body.contains("\"Aula de Rust\" está pronto"));
}

#[tokio::test]
async fn test_failed_event_sends_failure_mail() {
    let dir = temp_templates_dir();
    let (dispatcher, transport) = pipeline(&dir);

    let receipt = dispatcher.dispatch(&event("VIDEO_FAILED")).await.unwrap();

    assert_eq!(
        receipt.subject,
        "Falha no processamento do vídeo \"Aula de Rust\""
    );
    assert!(transport.sent()[0]
        .html_body
        .contains("não pôde ser processado"));
}

#[tokio::test]
async fn test_invalid_event_sends_nothing() {
    let dir = temp_templates_dir();
    let (dispatcher, transport) = pipeline(&dir);

    let mut event = event("VIDEO_PROCESSED");
    event.user.email = "not-an-email".to_string();

    let err = dispatcher.dispatch(&event).await.unwrap_err();
    assert!(matches!(err, NotificationError::Validation(_)));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_missing_template_reported_and_nothing_sent() {
    let dir = std::env::temp_dir().join(format!("notify-missing-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let (dispatcher, transport) = pipeline(&dir);

    let err = dispatcher.dispatch(&event("VIDEO_PROCESSED")).await.unwrap_err();
    assert!(matches!(err, NotificationError::TemplateLoad { .. }));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_template_survives_source_deletion() {
    let dir = temp_templates_dir();
    let (dispatcher, transport) = pipeline(&dir);

    dispatcher.dispatch(&event("VIDEO_PROCESSED")).await.unwrap();
    std::fs::remove_file(dir.join("video_processed.hbs")).unwrap();
    dispatcher.dispatch(&event("VIDEO_PROCESSED")).await.unwrap();

    assert_eq!(transport.sent().len(), 2);
}
