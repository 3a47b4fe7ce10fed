//! Mail delivery behind a transport trait.

use crate::error::{NotificationError, NotificationResult};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

/// A fully assembled mail waiting to be delivered.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Delivery receipt.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
}

/// Seam between the dispatch pipeline and the wire.
///
/// Production uses [`SmtpTransport`]; tests substitute a recording
/// implementation.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> NotificationResult<SentMail>;
}

/// SMTP connection settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_email: String,
}

impl SmtpConfig {
    /// Build from `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASS`
    /// and `FROM_EMAIL`. Credentials are optional; a local relay such
    /// as Mailpit needs none.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1025),
            username: std::env::var("SMTP_USER").ok().filter(|v| !v.is_empty()),
            password: std::env::var("SMTP_PASS").ok().filter(|v| !v.is_empty()),
            from_email: std::env::var("FROM_EMAIL")
                .unwrap_or_else(|_| "no-reply@example.com".to_string()),
        }
    }
}

/// Transport that relays HTML mail over SMTP.
pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
}

impl SmtpTransport {
    pub fn new(config: &SmtpConfig) -> Self {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
                .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Self {
            mailer: builder.build(),
            from_email: config.from_email.clone(),
        }
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, mail: OutgoingMail) -> NotificationResult<SentMail> {
        let message = Message::builder()
            .from(self.from_email.parse()?)
            .to(mail.to.parse().map_err(NotificationError::from)?)
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body)?;

        let response = self.mailer.send(message).await?;

        // The relay's delivery identifier, e.g. "Ok: queued as A1B2C3".
        let delivery_id = response.message().next().map(|s| s.to_string());
        info!(
            to = %mail.to,
            subject = %mail.subject,
            code = %response.code(),
            delivery_id = ?delivery_id,
            "Email sent"
        );

        Ok(SentMail {
            to: mail.to,
            subject: mail.subject,
        })
    }
}
