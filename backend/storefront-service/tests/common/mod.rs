//! Shared fixtures for storefront-service integration tests
#![allow(dead_code)]

use actix_web::web;
use futures::FutureExt;
use std::sync::{Arc, Mutex};

use storefront_service::config::GatewayConfig;
use storefront_service::kafka::{ClickEventPublisher, DeliveryFuture, EventSink, PublishError};
use storefront_service::models::{Category, Product};
use storefront_service::services::RecommendationGateway;
use storefront_service::{AppState, Catalog};

pub const TOPIC: &str = "click-events";

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub topic: String,
    pub key: String,
    pub payload: String,
}

/// In-memory stand-in for the Kafka producer
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingSink {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn enqueue(
        &self,
        topic: &str,
        key: &str,
        payload: &str,
    ) -> Result<DeliveryFuture, PublishError> {
        self.sent.lock().unwrap().push(SentMessage {
            topic: topic.to_string(),
            key: key.to_string(),
            payload: payload.to_string(),
        });
        Ok(async { Ok(()) }.boxed())
    }
}

pub fn product(id: u64, category: Category, product_type: &str, price: u32) -> Product {
    Product {
        id,
        category,
        product_type: product_type.to_string(),
        product_name: format!("LG {} No.{}", product_type, id),
        price,
        image: format!("/images/item-{}.jpg", id),
        description: format!("Premium {} {}", category, product_type),
        brand: "LG".to_string(),
        rating: "4.5".to_string(),
    }
}

/// Ten products with distinct prices; id 7 is an Electronics laptop at 900000.
pub fn fixture_catalog() -> Catalog {
    let mut products = Vec::new();
    for id in 1..=10u64 {
        let p = match id {
            7 => product(7, Category::Electronics, "Laptop", 900_000),
            id if id % 2 == 0 => {
                product(id, Category::Fashion, "Shoes", 50_000 + id as u32 * 1_000)
            }
            id => product(id, Category::Appliances, "TV", 500_000 + id as u32 * 10_000),
        };
        products.push(p);
    }
    Catalog::from_products(products)
}

pub fn gateway(base_url: &str) -> RecommendationGateway {
    RecommendationGateway::new(&GatewayConfig {
        base_url: base_url.to_string(),
        connect_timeout_secs: 1,
        read_timeout_secs: 1,
    })
    .expect("gateway client")
}

pub fn state_with_sink(
    catalog: Catalog,
    sink: Arc<dyn EventSink>,
    gateway_url: &str,
) -> web::Data<AppState> {
    web::Data::new(AppState {
        catalog,
        publisher: ClickEventPublisher::new(sink, TOPIC),
        gateway: gateway(gateway_url),
    })
}

/// Gateway pointed at a port nothing listens on
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";
