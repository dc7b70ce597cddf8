//! Domain models for storefront-service
//!
//! `Product` is the read-only catalog record served over HTTP.
//! `ClickEvent` is the payload published to Kafka for every product click.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator written into every click event
pub const PRODUCT_CLICK_EVENT: &str = "product_click";

/// Placeholder user until authentication exists
pub const ANONYMOUS_USER: &str = "anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Fashion,
    Appliances,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Fashion => "Fashion",
            Category::Appliances => "Appliances",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub category: Category,
    pub product_type: String,
    pub product_name: String,
    pub price: u32,
    pub image: String,
    pub description: String,
    pub brand: String,
    pub rating: String,
}

/// Click event as it appears on the `click-events` topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub event_type: String,
    pub user_id: String,
    pub product_id: u64,
    pub product_name: String,
    pub category: Category,
    pub price: u32,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
}

impl ClickEvent {
    pub fn from_product(product: &Product) -> Self {
        Self::at(product, Utc::now())
    }

    /// Build an event stamped with an explicit creation time.
    ///
    /// The session id is derived from the same instant (`session_<unix millis>`),
    /// so it identifies the click rather than a real browser session.
    pub fn at(product: &Product, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_type: PRODUCT_CLICK_EVENT.to_string(),
            user_id: ANONYMOUS_USER.to_string(),
            product_id: product.id,
            product_name: product.product_name.clone(),
            category: product.category,
            price: product.price,
            timestamp,
            session_id: format!("session_{}", timestamp.timestamp_millis()),
        }
    }

    /// Kafka message key; keeps all clicks on one product in one partition
    pub fn partition_key(&self) -> String {
        self.product_id.to_string()
    }
}
