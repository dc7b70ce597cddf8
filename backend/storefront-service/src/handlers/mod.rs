//! HTTP handlers for storefront endpoints
//!
//! - Items: catalog listing, details and click tracking
//! - Recommendations: pass-through to the external prediction service
//! - Health: liveness/readiness probes

pub mod health;
pub mod items;
pub mod recommendations;

use actix_web::web;

pub use items::{click_item, item_details, list_items, recommend_page};
pub use recommendations::{
    analytics, association_rules, group_info, predict, product_recommendations,
    session_recommendations,
};

use crate::metrics::serve_metrics;

/// Register every storefront route. Shared by `main` and integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/health", web::get().to(health::health))
        .route("/api/v1/health/live", web::get().to(health::liveness))
        .route("/api/v1/health/ready", web::get().to(health::readiness))
        .route("/metrics", web::get().to(serve_metrics))
        .route("/predict", web::post().to(predict))
        .service(
            web::scope("/item")
                .route("/list", web::get().to(list_items))
                .route("/details", web::get().to(item_details))
                .route("/click", web::post().to(click_item))
                .route("/recommend", web::get().to(recommend_page))
                .route("/recommend/product", web::get().to(product_recommendations))
                .route("/recommend/session", web::get().to(session_recommendations))
                .route("/groups/info", web::get().to(group_info))
                .route("/association-rules", web::get().to(association_rules))
                .route("/analytics", web::get().to(analytics)),
        );
}
