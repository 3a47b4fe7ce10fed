//! Pushes a sample event onto the video-events stream.
//!
//! Run with: cargo run -p notification_service --bin produce_test_event

use chrono::Utc;
use eyre::Result;
use serde_json::json;
use stream_consumer::{ConsumerConfig, StreamProducer};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

    println!("Connecting to Redis at {}", redis_url);
    let client = redis::Client::open(redis_url.as_str())?;
    let redis = redis::aio::ConnectionManager::new(client).await?;

    let stream_name = ConsumerConfig::from_env().stream_name;
    let producer = StreamProducer::new(redis, stream_name);

    let event = json!({
        "eventId": uuid::Uuid::new_v4().to_string(),
        "eventType": "VIDEO_PROCESSED",
        "timestamp": Utc::now().to_rfc3339(),
        "user": {
            "id": "user-1",
            "name": "Maria",
            "email": "maria@example.com"
        },
        "data": {
            "videoTitle": "Introdução ao curso",
            "videoUrl": "https://videos.example.com/intro"
        }
    });

    let entry_id = producer.send(&event).await?;
    println!(
        "Event queued on '{}' with id {}",
        producer.stream_name(),
        entry_id
    );

    Ok(())
}
