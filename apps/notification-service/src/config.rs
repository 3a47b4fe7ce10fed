//! Environment-driven configuration.

use domain_notifications::SmtpConfig;
use stream_consumer::ConsumerConfig;

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Build from `HOST` and `PORT`, defaulting to `0.0.0.0:3000`.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Everything the service reads from the environment, loaded once at
/// startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub redis_url: String,
    pub templates_dir: String,
    pub smtp: SmtpConfig,
    pub consumer: ConsumerConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            templates_dir: std::env::var("TEMPLATES_DIR")
                .unwrap_or_else(|_| "templates".to_string()),
            smtp: SmtpConfig::from_env(),
            consumer: ConsumerConfig::from_env(),
        }
    }
}
