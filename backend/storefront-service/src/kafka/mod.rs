//! Click event publication to Kafka
//!
//! - `producer`: `EventSink` backed by rdkafka's `FutureProducer`
//! - `publisher`: builds payloads and hands them to a sink without blocking
//!   the request that triggered them

pub mod producer;
pub mod publisher;

use futures::future::BoxFuture;
use rdkafka::error::KafkaError;
use std::time::Duration;
use thiserror::Error;

pub use producer::KafkaEventSink;
pub use publisher::ClickEventPublisher;

/// Resolves once the broker acknowledged (or rejected) a queued message
pub type DeliveryFuture = BoxFuture<'static, Result<(), PublishError>>;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Kafka error: {0}")]
    Kafka(#[from] KafkaError),

    #[error("Delivery canceled before the broker answered")]
    Canceled,
}

/// Outbound message queue for a broker.
///
/// `enqueue` must hand the message to the client synchronously; messages
/// enqueued with the same key from one process keep their relative order.
pub trait EventSink: Send + Sync {
    fn enqueue(&self, topic: &str, key: &str, payload: &str)
        -> Result<DeliveryFuture, PublishError>;

    /// Wait for queued messages to be delivered, up to `timeout`.
    fn flush(&self, _timeout: Duration) -> Result<(), PublishError> {
        Ok(())
    }
}
