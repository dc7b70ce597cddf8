//! Prometheus metrics for storefront-service.
//!
//! Collectors are process-global and exposed by [`serve_metrics`] on `/metrics`.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Click events by publish result (published, failed, serialization_failed).
    pub static ref CLICK_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "storefront_click_events_total",
        "Click events segmented by publish result",
        &["result"]
    )
    .expect("failed to register storefront_click_events_total");

    /// Recommendation gateway calls by endpoint and outcome.
    pub static ref GATEWAY_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "storefront_gateway_requests_total",
        "Recommendation gateway requests segmented by endpoint and outcome",
        &["endpoint", "outcome"]
    )
    .expect("failed to register storefront_gateway_requests_total");

    pub static ref GATEWAY_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "storefront_gateway_request_duration_seconds",
        "Recommendation gateway request duration by endpoint",
        &["endpoint"]
    )
    .expect("failed to register storefront_gateway_request_duration_seconds");
}

pub fn record_click_event(result: &str) {
    CLICK_EVENTS_TOTAL.with_label_values(&[result]).inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
