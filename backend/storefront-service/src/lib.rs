//! Storefront Service
//!
//! Demo e-commerce front end: serves a generated product catalog, publishes
//! product clicks to Kafka and proxies recommendation/analytics queries to the
//! external prediction service.

pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod kafka;
pub mod metrics;
pub mod models;
pub mod services;

// Public re-exports
pub use catalog::Catalog;
pub use config::Config;
pub use error::{AppError, Result};

use kafka::ClickEventPublisher;
use services::RecommendationGateway;

/// Process-wide handles shared by every request
///
/// Built once at startup and handed to actix as `web::Data`; nothing in here
/// is mutated after construction.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub publisher: ClickEventPublisher,
    pub gateway: RecommendationGateway,
}
