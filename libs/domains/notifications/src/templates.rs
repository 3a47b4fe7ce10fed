//! On-disk Handlebars templates with a compile-once cache.

use crate::error::{NotificationError, NotificationResult};
use crate::event::{EventPayload, EventType, User};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::debug;

/// File extension of template sources on disk.
const TEMPLATE_EXTENSION: &str = "hbs";

/// Compiled templates keyed by name.
///
/// Populated lazily on first use, never evicted; a changed template
/// file on disk takes effect only after a process restart. Concurrent
/// first-use of the same name may compile twice, which is idempotent.
#[derive(Default)]
pub struct TemplateCache {
    registry: RwLock<Handlebars<'static>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Handlebars::new()),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry
            .read()
            .expect("template cache lock poisoned")
            .has_template(name)
    }

    fn insert(&self, name: &str, source: &str) -> NotificationResult<()> {
        self.registry
            .write()
            .expect("template cache lock poisoned")
            .register_template_string(name, source)?;
        Ok(())
    }

    fn render<T: Serialize>(&self, name: &str, ctx: &T) -> NotificationResult<String> {
        Ok(self
            .registry
            .read()
            .expect("template cache lock poisoned")
            .render(name, ctx)?)
    }
}

/// Context handed to every mail template.
#[derive(Serialize)]
struct MailContext<'a> {
    user: &'a User,
    data: &'a serde_json::Map<String, serde_json::Value>,
}

/// Translates an event into a rendered HTML fragment.
///
/// Owns its [`TemplateCache`] exclusively; the cache is constructed at
/// the composition root and handed in.
pub struct TemplateRenderer {
    templates_dir: PathBuf,
    cache: TemplateCache,
}

impl TemplateRenderer {
    pub fn new(templates_dir: impl Into<PathBuf>, cache: TemplateCache) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            cache,
        }
    }

    /// Template name for an event type.
    ///
    /// Any event type other than `VIDEO_PROCESSED` falls into the
    /// failure template.
    pub fn template_name(event_type: EventType) -> &'static str {
        match event_type {
            EventType::VideoProcessed => "video_processed",
            _ => "video_failed",
        }
    }

    /// Render the template for an event with `{ user, data }` context.
    ///
    /// The first use of a name reads and compiles
    /// `<templates_dir>/<name>.hbs`; later uses hit the cache.
    pub async fn render_for_event(&self, event: &EventPayload) -> NotificationResult<String> {
        let name = Self::template_name(event.event_type);

        if !self.cache.contains(name) {
            let path = self
                .templates_dir
                .join(format!("{}.{}", name, TEMPLATE_EXTENSION));
            debug!(template = %name, path = %path.display(), "Compiling template");
            let source = tokio::fs::read_to_string(&path).await.map_err(|source| {
                NotificationError::TemplateLoad {
                    name: name.to_string(),
                    source,
                }
            })?;
            self.cache.insert(name, &source)?;
        }

        self.cache.render(
            name,
            &MailContext {
                user: &event.user,
                data: &event.data,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    fn temp_templates_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("notify-templates-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("video_processed.hbs"),
            "<p>Olá {{user.name}}, \"{{data.videoTitle}}\" foi processado.</p>",
        )
        .unwrap();
        std::fs::write(
            dir.join("video_failed.hbs"),
            "<p>Olá {{user.name}}, o processamento de \"{{data.videoTitle}}\" falhou.</p>",
        )
        .unwrap();
        dir
    }

    fn event(event_type: &str) -> EventPayload {
        serde_json::from_value(json!({
            "eventId": "evt-1",
            "eventType": event_type,
            "timestamp": "2024-01-01T00:00:00Z",
            "user": { "id": "u1", "name": "Rafa", "email": "a@b.com" },
            "data": { "videoTitle": "Aula 1" }
        }))
        .unwrap()
    }

    fn renderer(dir: &Path) -> TemplateRenderer {
        TemplateRenderer::new(dir, TemplateCache::new())
    }

    #[test]
    fn test_template_name_mapping() {
        assert_eq!(
            TemplateRenderer::template_name(EventType::VideoProcessed),
            "video_processed"
        );
        assert_eq!(
            TemplateRenderer::template_name(EventType::VideoFailed),
            "video_failed"
        );
    }

    #[tokio::test]
    async fn test_render_processed_template() {
        let dir = temp_templates_dir();
        let html = renderer(&dir)
            .render_for_event(&event("VIDEO_PROCESSED"))
            .await
            .unwrap();
        assert!(html.contains("\"Aula 1\" foi processado"));
        assert!(html.contains("Olá Rafa"));
    }

    #[tokio::test]
    async fn test_render_failed_template() {
        let dir = temp_templates_dir();
        let html = renderer(&dir)
            .render_for_event(&event("VIDEO_FAILED"))
            .await
            .unwrap();
        assert!(html.contains("falhou"));
    }

    #[tokio::test]
    async fn test_missing_video_title_renders_empty() {
        let dir = temp_templates_dir();
        let mut event = event("VIDEO_PROCESSED");
        event.data = serde_json::Map::new();
        let html = renderer(&dir).render_for_event(&event).await.unwrap();
        assert!(html.contains("\"\" foi processado"));
    }

    #[tokio::test]
    async fn test_template_compiled_once() {
        let dir = temp_templates_dir();
        let renderer = renderer(&dir);
        let event = event("VIDEO_PROCESSED");

        renderer.render_for_event(&event).await.unwrap();

        // The source file is gone; a second render must come from the cache.
        std::fs::remove_file(dir.join("video_processed.hbs")).unwrap();
        let html = renderer.render_for_event(&event).await.unwrap();
        assert!(html.contains("foi processado"));
    }

    #[tokio::test]
    async fn test_missing_template_file_fails_with_load_error() {
        let dir = std::env::temp_dir().join(format!("notify-empty-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let err = renderer(&dir)
            .render_for_event(&event("VIDEO_PROCESSED"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NotificationError::TemplateLoad { ref name, .. } if name == "video_processed"
        ));
    }
}
