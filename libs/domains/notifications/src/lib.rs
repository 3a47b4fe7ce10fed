//! Notifications Domain
//!
//! Turns video lifecycle events into transactional emails: validate
//! the payload, render the matching Handlebars template, send the
//! result over SMTP.
//!
//! The pipeline is assembled explicitly at the application's
//! composition root:
//!
//! ```ignore
//! let renderer = TemplateRenderer::new(templates_dir, TemplateCache::new());
//! let transport = Arc::new(SmtpTransport::new(&smtp_config));
//! let mailer = Mailer::new(renderer, transport);
//! let dispatcher = Arc::new(NotificationDispatcher::new(mailer));
//! ```

mod dispatcher;
mod error;
mod event;
mod mailer;
mod templates;
mod transport;

pub use dispatcher::{DispatchHandler, NotificationDispatcher};
pub use error::{FieldError, NotificationError, NotificationResult, ValidationError};
pub use event::{EventPayload, EventType, User};
pub use mailer::{subject_for, Mailer};
pub use templates::{TemplateCache, TemplateRenderer};
pub use transport::{MailTransport, OutgoingMail, SentMail, SmtpConfig, SmtpTransport};
