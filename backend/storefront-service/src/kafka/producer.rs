use futures::FutureExt;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::{debug, info};

use super::{DeliveryFuture, EventSink, PublishError};
use crate::config::KafkaConfig;

/// Kafka producer wrapper for click events
#[derive(Clone)]
pub struct KafkaEventSink {
    producer: FutureProducer,
}

impl KafkaEventSink {
    /// Create the producer. librdkafka connects lazily, so an unreachable
    /// broker does not fail here; it surfaces as delivery errors later.
    pub fn new(config: &KafkaConfig) -> Result<Self, PublishError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", config.message_timeout_ms.to_string())
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("compression.type", "lz4")
            .set("queue.buffering.max.messages", "100000")
            .create()?;

        info!(brokers = %config.brokers, "Kafka producer created");

        Ok(Self { producer })
    }
}

impl EventSink for KafkaEventSink {
    fn enqueue(
        &self,
        topic: &str,
        key: &str,
        payload: &str,
    ) -> Result<DeliveryFuture, PublishError> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        debug!("Queueing event for topic {} (key={})", topic, key);

        let delivery = self
            .producer
            .send_result(record)
            .map_err(|(err, _)| PublishError::Kafka(err))?;

        Ok(async move {
            match delivery.await {
                Ok(Ok(_)) => Ok(()),
                Ok(Err((err, _))) => Err(PublishError::Kafka(err)),
                Err(_) => Err(PublishError::Canceled),
            }
        }
        .boxed())
    }

    fn flush(&self, timeout: Duration) -> Result<(), PublishError> {
        self.producer.flush(timeout).map_err(PublishError::Kafka)
    }
}
