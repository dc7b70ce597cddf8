use actix_web::HttpResponse;
use serde_json::json;

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// The catalog is built before the server binds, so a running server is ready.
pub async fn readiness() -> HttpResponse {
    HttpResponse::Ok().finish()
}
