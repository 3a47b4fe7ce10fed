//! Notification Service Entry Point

use eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    notification_service::run().await
}
