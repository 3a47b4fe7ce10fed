//! Notification Service
//!
//! Listens for video lifecycle events and emails the affected user.
//! Events arrive on two paths that share one dispatch pipeline:
//!
//! ```text
//! Redis Stream (video-events)                POST /notifications
//!   ↓ (consumer group, new entries only)       ↓ (synchronous)
//! StreamWorker<DispatchHandler>               axum handler
//!   └──────────────┬────────────────────────────┘
//!                  ↓
//!        NotificationDispatcher
//!          validate → render (Handlebars) → send (SMTP)
//! ```

pub mod api;
pub mod config;
pub mod state;
pub mod telemetry;

use config::Config;
use domain_notifications::{
    DispatchHandler, Mailer, NotificationDispatcher, SmtpTransport, TemplateCache,
    TemplateRenderer,
};
use eyre::{Result, WrapErr};
use state::AppState;
use std::sync::Arc;
use stream_consumer::StreamWorker;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

/// Run the service until a shutdown signal arrives.
pub async fn run() -> Result<()> {
    telemetry::init_tracing();

    let config = Config::from_env();
    info!(
        stream = %config.consumer.stream_name,
        consumer_group = %config.consumer.consumer_group,
        templates_dir = %config.templates_dir,
        "Starting notification service"
    );

    // One Redis connection manager shared by the worker
    let client = redis::Client::open(config.redis_url.as_str())
        .wrap_err("Invalid Redis URL")?;
    let redis = redis::aio::ConnectionManager::new(client)
        .await
        .wrap_err("Failed to connect to Redis")?;
    info!("Connected to Redis");

    // Assemble the dispatch pipeline explicitly
    let renderer = TemplateRenderer::new(&config.templates_dir, TemplateCache::new());
    let transport = Arc::new(SmtpTransport::new(&config.smtp));
    let mailer = Mailer::new(renderer, transport);
    let dispatcher = Arc::new(NotificationDispatcher::new(mailer));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Broker subscription in the background
    let worker = StreamWorker::new(
        redis,
        DispatchHandler::new(dispatcher.clone()),
        config.consumer.clone(),
    );
    let worker_handle = tokio::spawn(async move {
        if let Err(e) = worker.run(shutdown_rx).await {
            error!(error = %e, "Stream worker stopped with error");
        }
    });

    // HTTP ingress in the foreground
    let app = api::router(AppState::new(dispatcher));
    let address = config.server.address();
    let listener = TcpListener::bind(&address)
        .await
        .wrap_err_with(|| format!("Failed to bind to {}", address))?;
    info!(address = %address, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("HTTP server failed")?;

    // Server is down; stop the worker too
    let _ = shutdown_tx.send(true);
    let _ = worker_handle.await;

    info!("Notification service stopped");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        },
    }
}
