mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{fixture_catalog, state_with_sink, RecordingSink, TOPIC, UNREACHABLE_URL};
use storefront_service::catalog::{CATEGORY_TEMPLATES, DEFAULT_CATALOG_SIZE};
use storefront_service::config::KafkaConfig;
use storefront_service::error::ErrorResponse;
use storefront_service::handlers;
use storefront_service::handlers::items::CLICK_ACCEPTED;
use storefront_service::kafka::KafkaEventSink;
use storefront_service::models::{Category, ClickEvent, Product};
use storefront_service::Catalog;

#[actix_web::test]
async fn list_returns_whole_catalog_in_id_order() {
    let mut rng = StdRng::seed_from_u64(11);
    let catalog = Catalog::generate(CATEGORY_TEMPLATES, DEFAULT_CATALOG_SIZE, &mut rng).unwrap();
    let sink = Arc::new(RecordingSink::default());
    let state = state_with_sink(catalog, sink, UNREACHABLE_URL);
    let app = test::init_service(App::new().app_data(state).configure(handlers::configure)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/item/list").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let products: Vec<Product> = test::read_body_json(resp).await;
    assert_eq!(products.len(), DEFAULT_CATALOG_SIZE);
    assert!(products.iter().enumerate().all(|(i, p)| p.id == i as u64 + 1));
}

#[actix_web::test]
async fn details_returns_product_or_not_found() {
    let sink = Arc::new(RecordingSink::default());
    let state = state_with_sink(fixture_catalog(), sink.clone(), UNREACHABLE_URL);
    let app = test::init_service(App::new().app_data(state).configure(handlers::configure)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/item/details?id=7").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], 7);
    assert_eq!(body["category"], "Electronics");
    assert_eq!(body["productType"], "Laptop");
    assert_eq!(body["price"], 900_000);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/item/details?id=11").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "Product not found: 11");
    assert_eq!(body.code, 404);

    // Viewing details never publishes anything.
    assert!(sink.sent().is_empty());
}

#[actix_web::test]
async fn details_requires_numeric_id() {
    let sink = Arc::new(RecordingSink::default());
    let state = state_with_sink(fixture_catalog(), sink, UNREACHABLE_URL);
    let app = test::init_service(App::new().app_data(state).configure(handlers::configure)).await;

    for uri in ["/item/details", "/item/details?id=abc", "/item/details?id=-1"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[actix_web::test]
async fn click_publishes_event_keyed_by_product_id() {
    let sink = Arc::new(RecordingSink::default());
    let state = state_with_sink(fixture_catalog(), sink.clone(), UNREACHABLE_URL);
    let app = test::init_service(App::new().app_data(state).configure(handlers::configure)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/item/click?id=7").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body, CLICK_ACCEPTED.as_bytes());

    let sent = sink.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].topic, TOPIC);
    assert_eq!(sent[0].key, "7");

    let event: ClickEvent = serde_json::from_str(&sent[0].payload).unwrap();
    assert_eq!(event.event_type, "product_click");
    assert_eq!(event.product_id, 7);
    assert_eq!(event.category, Category::Electronics);
    assert_eq!(event.price, 900_000);
    assert_eq!(event.user_id, "anonymous");
    assert!(event.session_id.starts_with("session_"));
}

#[actix_web::test]
async fn click_on_unknown_product_is_rejected_without_publish() {
    let sink = Arc::new(RecordingSink::default());
    let state = state_with_sink(fixture_catalog(), sink.clone(), UNREACHABLE_URL);
    let app = test::init_service(App::new().app_data(state).configure(handlers::configure)).await;

    for id in [0u64, 11, 9_999] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/item/click?id={}", id))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, format!("Product not found: {}", id));
    }

    assert!(sink.sent().is_empty());
}

#[actix_web::test]
async fn click_succeeds_when_broker_is_unreachable() {
    let sink = KafkaEventSink::new(&KafkaConfig {
        brokers: "127.0.0.1:1".to_string(),
        click_events_topic: TOPIC.to_string(),
        message_timeout_ms: 1000,
    })
    .expect("producer creation does not contact the broker");
    let state = state_with_sink(fixture_catalog(), Arc::new(sink), UNREACHABLE_URL);
    let app = test::init_service(App::new().app_data(state).configure(handlers::configure)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/item/click?id=3").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, CLICK_ACCEPTED.as_bytes());
}

#[actix_web::test]
async fn recommend_page_embeds_analytics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analytics/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"total_events": 42, "top_products": []})),
        )
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let state = state_with_sink(fixture_catalog(), sink, &server.uri());
    let app = test::init_service(App::new().app_data(state).configure(handlers::configure)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/item/recommend").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["analytics_data"]["total_events"], 42);
    assert_eq!(body["all_items"].as_array().unwrap().len(), 10);

    let popular = body["popular_items"].as_array().unwrap();
    assert_eq!(popular.len(), 10);
    let prices: Vec<u64> = popular.iter().map(|p| p["price"].as_u64().unwrap()).collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));
}

#[actix_web::test]
async fn recommend_page_survives_analytics_outage() {
    let sink = Arc::new(RecordingSink::default());
    let state = state_with_sink(fixture_catalog(), sink, UNREACHABLE_URL);
    let app = test::init_service(App::new().app_data(state).configure(handlers::configure)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/item/recommend").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let error = body["analytics_data"]["error"].as_str().unwrap();
    assert!(error.starts_with("Could not reach the analytics service"));
    assert_eq!(body["popular_items"].as_array().unwrap().len(), 10);
}

#[actix_web::test]
async fn health_probes_respond() {
    let sink = Arc::new(RecordingSink::default());
    let state = state_with_sink(fixture_catalog(), sink, UNREACHABLE_URL);
    let app = test::init_service(App::new().app_data(state).configure(handlers::configure)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/health").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");

    for uri in ["/api/v1/health/live", "/api/v1/health/ready", "/metrics"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
    }
}
