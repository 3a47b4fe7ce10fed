//! Stream Consumer
//!
//! A minimal Redis Streams consumer-group framework for feeding
//! messages through a handler, one at a time.
//!
//! ## Semantics
//!
//! - **Consumer groups**: subscription starts at the current end of
//!   the stream (`$`), never from history
//! - **Sequential handling**: the next entry is not pulled until the
//!   current handler call completes, preserving in-stream order
//! - **Logged-and-dropped failures**: malformed payloads and handler
//!   errors are logged with message context and acknowledged; there is
//!   no retry and no dead-letter stream
//! - **Silent skip**: entries with an absent or empty value are
//!   acknowledged without dispatch or logging
//!
//! ## Example
//!
//! ```ignore
//! use stream_consumer::{ConsumerConfig, MessageHandler, StreamWorker};
//!
//! let config = ConsumerConfig::from_env();
//! let worker = StreamWorker::new(redis, handler, config);
//! worker.run(shutdown_rx).await?;
//! ```

mod config;
mod consumer;
mod error;
mod producer;
mod worker;

pub use config::ConsumerConfig;
pub use consumer::{StreamConsumer, StreamMessage};
pub use error::StreamError;
pub use producer::StreamProducer;
pub use worker::{MessageHandler, StreamWorker};
