//! Item handlers - catalog browsing and click tracking

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::models::{ClickEvent, Product};
use crate::AppState;

/// Body returned when a click was accepted for publishing
pub const CLICK_ACCEPTED: &str = "Click event accepted";

/// Number of products shown as popular on the recommendation page
pub const POPULAR_ITEMS_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct ItemIdQuery {
    pub id: u64,
}

#[derive(Debug, Serialize)]
pub struct RecommendPage<'a> {
    pub popular_items: Vec<&'a Product>,
    pub all_items: &'a [Product],
    pub analytics_data: Value,
}

/// GET /item/list
pub async fn list_items(state: web::Data<AppState>) -> HttpResponse {
    info!(count = state.catalog.len(), "GET /item/list");
    HttpResponse::Ok().json(state.catalog.all())
}

/// GET /item/details?id=
pub async fn item_details(
    state: web::Data<AppState>,
    query: web::Query<ItemIdQuery>,
) -> Result<HttpResponse> {
    let id = query.id;
    info!(product_id = id, "GET /item/details");

    let product = state.catalog.find_by_id(id).ok_or_else(|| {
        warn!(product_id = id, "Product not found");
        AppError::product_not_found(id)
    })?;

    info!(product_id = id, product_name = %product.product_name, "Product details loaded");
    Ok(HttpResponse::Ok().json(product))
}

/// POST /item/click?id=
///
/// Responds as soon as the event is handed to the publisher; the broker
/// outcome only shows up in logs and metrics.
pub async fn click_item(
    state: web::Data<AppState>,
    query: web::Query<ItemIdQuery>,
) -> Result<HttpResponse> {
    let id = query.id;
    info!(product_id = id, "POST /item/click");

    let product = state.catalog.find_by_id(id).ok_or_else(|| {
        warn!(product_id = id, "Click on unknown product");
        AppError::BadRequest(format!("Product not found: {}", id))
    })?;

    let event = ClickEvent::from_product(product);
    // Detached: the publisher task logs the delivery result.
    let _ = state.publisher.publish(&event);
    info!(product_id = id, product_name = %product.product_name, "Click event submitted");

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(CLICK_ACCEPTED))
}

/// GET /item/recommend
///
/// Analytics failures are embedded in the page body instead of failing it.
pub async fn recommend_page(state: web::Data<AppState>) -> HttpResponse {
    info!("GET /item/recommend");

    let analytics_data = state.gateway.product_analytics().await.into_json();

    HttpResponse::Ok().json(RecommendPage {
        popular_items: state.catalog.popular(POPULAR_ITEMS_LIMIT),
        all_items: state.catalog.all(),
        analytics_data,
    })
}
