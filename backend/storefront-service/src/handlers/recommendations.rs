//! Pass-through handlers for the external prediction service

use actix_web::{web, HttpResponse};
use tracing::info;

use crate::services::gateway::{
    AssociationRulesQuery, GroupInfoQuery, PredictionRequest, ProductRecommendationQuery,
    SessionRecommendationQuery,
};
use crate::AppState;

/// GET /item/recommend/product
pub async fn product_recommendations(
    state: web::Data<AppState>,
    query: web::Query<ProductRecommendationQuery>,
) -> HttpResponse {
    info!(
        product_name = %query.product_name,
        min_confidence = query.min_confidence,
        max_recommendations = query.max_recommendations,
        time_window = query.time_window,
        "GET /item/recommend/product"
    );
    state.gateway.product_recommendations(&query).await.into_response()
}

/// GET /item/recommend/session
pub async fn session_recommendations(
    state: web::Data<AppState>,
    query: web::Query<SessionRecommendationQuery>,
) -> HttpResponse {
    info!(
        session_id = %query.session_id,
        min_confidence = query.min_confidence,
        max_recommendations = query.max_recommendations,
        "GET /item/recommend/session"
    );
    state.gateway.session_recommendations(&query).await.into_response()
}

/// GET /item/groups/info
pub async fn group_info(
    state: web::Data<AppState>,
    query: web::Query<GroupInfoQuery>,
) -> HttpResponse {
    info!(time_window = query.time_window, "GET /item/groups/info");
    state.gateway.group_info(&query).await.into_response()
}

/// GET /item/association-rules
pub async fn association_rules(
    state: web::Data<AppState>,
    query: web::Query<AssociationRulesQuery>,
) -> HttpResponse {
    info!(
        min_support = query.min_support,
        min_confidence = query.min_confidence,
        limit = query.limit,
        "GET /item/association-rules"
    );
    state.gateway.association_rules(&query).await.into_response()
}

/// GET /item/analytics
pub async fn analytics(state: web::Data<AppState>) -> HttpResponse {
    info!("GET /item/analytics");
    state.gateway.product_analytics().await.into_response()
}

/// POST /predict
pub async fn predict(
    state: web::Data<AppState>,
    input: web::Json<PredictionRequest>,
) -> HttpResponse {
    info!(age = input.age, hours_per_week = input.hours_per_week, "POST /predict");
    state.gateway.predict(&input).await.into_response()
}
