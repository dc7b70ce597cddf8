use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::{EventSink, PublishError};
use crate::metrics::record_click_event;
use crate::models::ClickEvent;

/// Fire-and-forget publisher for product click events.
///
/// Nothing here reports back to the HTTP caller: serialization and broker
/// failures are logged and counted, never retried.
#[derive(Clone)]
pub struct ClickEventPublisher {
    sink: Arc<dyn EventSink>,
    topic: String,
}

impl ClickEventPublisher {
    pub fn new(sink: Arc<dyn EventSink>, topic: impl Into<String>) -> Self {
        Self {
            sink,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Queue `event` keyed by its product id and return the task that logs
    /// the delivery outcome. `None` means nothing was queued.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn publish(&self, event: &ClickEvent) -> Option<JoinHandle<()>> {
        self.publish_payload(event.product_id, &event.partition_key(), event)
    }

    fn publish_payload<T: Serialize>(
        &self,
        product_id: u64,
        key: &str,
        event: &T,
    ) -> Option<JoinHandle<()>> {
        let payload = match serde_json::to_string(event).map_err(PublishError::from) {
            Ok(payload) => payload,
            Err(e) => {
                error!(
                    product_id,
                    error = %e,
                    "Failed to serialize click event, skipping publish"
                );
                record_click_event("serialization_failed");
                return None;
            }
        };

        let delivery = match self.sink.enqueue(&self.topic, key, &payload) {
            Ok(delivery) => delivery,
            Err(e) => {
                error!(product_id, error = %e, "Failed to queue click event");
                record_click_event("failed");
                return None;
            }
        };

        let topic = self.topic.clone();
        Some(tokio::spawn(async move {
            match delivery.await {
                Ok(()) => {
                    info!(product_id, topic = %topic, "Click event published");
                    record_click_event("published");
                }
                Err(e) => {
                    error!(product_id, error = %e, "Click event publish failed");
                    record_click_event("failed");
                }
            }
        }))
    }

    /// Give queued events a bounded chance to reach the broker on shutdown.
    pub fn flush(&self, timeout: Duration) {
        if let Err(e) = self.sink.flush(timeout) {
            warn!(error = %e, "Kafka flush did not complete");
        }
    }
}

impl std::fmt::Debug for ClickEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickEventPublisher")
            .field("topic", &self.topic)
            .finish()
    }
}

// Variant used by tests that need a payload serde refuses to encode
#[cfg(test)]
impl ClickEventPublisher {
    fn publish_raw<T: Serialize>(&self, product_id: u64, event: &T) -> Option<JoinHandle<()>> {
        self.publish_payload(product_id, &product_id.to_string(), event)
    }
}
