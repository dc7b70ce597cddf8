//! Recommendation gateway
//!
//! Thin HTTP client for the external prediction service that owns
//! recommendations, association rules and click analytics. Every call is a
//! single attempt bounded by the configured timeouts; the upstream JSON is
//! relayed untouched and failures are folded into [`GatewayOutcome`].

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::error::Error as StdError;
use tracing::{error, info, warn};

use crate::config::GatewayConfig;
use crate::error::ErrorResponse;
use crate::metrics::{GATEWAY_REQUESTS_TOTAL, GATEWAY_REQUEST_DURATION_SECONDS};

/// Result of one gateway call
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayOutcome {
    /// Upstream JSON, relayed verbatim
    Success(Value),
    /// Upstream answered with nothing usable
    ClientError(String),
    /// Transport failure, timeout, error status or undecodable body
    ServerError(String),
}

impl GatewayOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            GatewayOutcome::Success(_) => "success",
            GatewayOutcome::ClientError(_) => "client_error",
            GatewayOutcome::ServerError(_) => "server_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayOutcome::Success(_) => StatusCode::OK,
            GatewayOutcome::ClientError(_) => StatusCode::BAD_REQUEST,
            GatewayOutcome::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Upstream body on success, otherwise `{"error": message}`
    pub fn into_json(self) -> Value {
        match self {
            GatewayOutcome::Success(value) => value,
            GatewayOutcome::ClientError(message) | GatewayOutcome::ServerError(message) => {
                json!({ "error": message })
            }
        }
    }

    pub fn into_response(self) -> HttpResponse {
        let status = self.status_code();
        match self {
            GatewayOutcome::Success(value) => HttpResponse::Ok().json(value),
            GatewayOutcome::ClientError(message) | GatewayOutcome::ServerError(message) => {
                ErrorResponse::new(message, status).into_response(status)
            }
        }
    }
}

/// Upstream operation plus the messages used when it fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub unavailable: &'static str,
    pub unreachable: &'static str,
}

pub const PRODUCT_RECOMMENDATIONS: Endpoint = Endpoint {
    name: "product_recommendations",
    unavailable: "Recommendation results are unavailable",
    unreachable: "Could not reach the recommendation service",
};

pub const SESSION_RECOMMENDATIONS: Endpoint = Endpoint {
    name: "session_recommendations",
    unavailable: "Session recommendation results are unavailable",
    unreachable: "Could not reach the session recommendation service",
};

pub const GROUP_INFO: Endpoint = Endpoint {
    name: "group_info",
    unavailable: "Group info is unavailable",
    unreachable: "Could not reach the group info service",
};

pub const ASSOCIATION_RULES: Endpoint = Endpoint {
    name: "association_rules",
    unavailable: "Association rules are unavailable",
    unreachable: "Could not reach the association rule service",
};

pub const PRODUCT_ANALYTICS: Endpoint = Endpoint {
    name: "product_analytics",
    unavailable: "Analytics are unavailable",
    unreachable: "Could not reach the analytics service",
};

pub const PREDICTION: Endpoint = Endpoint {
    name: "prediction",
    unavailable: "Prediction is unavailable",
    unreachable: "Could not reach the prediction service",
};

fn default_min_confidence() -> f64 {
    0.5
}

fn default_max_recommendations() -> u32 {
    5
}

fn default_time_window() -> u32 {
    5
}

fn default_min_support() -> f64 {
    0.2
}

fn default_rule_limit() -> u32 {
    20
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecommendationQuery {
    pub product_name: String,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: u32,
    #[serde(default = "default_time_window")]
    pub time_window: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecommendationQuery {
    pub session_id: String,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfoQuery {
    #[serde(default = "default_time_window")]
    pub time_window: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationRulesQuery {
    #[serde(default = "default_min_support")]
    pub min_support: f64,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    #[serde(default = "default_rule_limit")]
    pub limit: u32,
}

/// Input row for the income prediction model.
///
/// Accepted from callers in camelCase and sent upstream with the model's
/// snake_case feature names. All categorical features are label-encoded ints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct PredictionRequest {
    pub age: i32,
    pub workclass: i32,
    pub fnlwgt: i32,
    pub education: i32,
    pub education_num: i32,
    pub marital_status: i32,
    pub occupation: i32,
    pub relationship: i32,
    pub race: i32,
    pub sex: i32,
    pub capital_gain: i32,
    pub capital_loss: i32,
    pub hours_per_week: f64,
    pub native_country: i32,
}

#[derive(Debug, Clone)]
pub struct RecommendationGateway {
    client: Client,
    base_url: String,
}

impl RecommendationGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        // Read timeout applies per read, so a slowly streamed body still succeeds
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn product_recommendations(
        &self,
        query: &ProductRecommendationQuery,
    ) -> GatewayOutcome {
        let path = format!("/recommend/{}", urlencoding::encode(&query.product_name));
        let request = self.client.get(self.url(&path)).query(&[
            ("min_confidence", query.min_confidence.to_string()),
            ("max_recommendations", query.max_recommendations.to_string()),
            ("time_window", query.time_window.to_string()),
        ]);
        self.execute(PRODUCT_RECOMMENDATIONS, request).await
    }

    pub async fn session_recommendations(
        &self,
        query: &SessionRecommendationQuery,
    ) -> GatewayOutcome {
        let path = format!("/recommend/session/{}", urlencoding::encode(&query.session_id));
        let request = self.client.get(self.url(&path)).query(&[
            ("min_confidence", query.min_confidence.to_string()),
            ("max_recommendations", query.max_recommendations.to_string()),
        ]);
        self.execute(SESSION_RECOMMENDATIONS, request).await
    }

    pub async fn group_info(&self, query: &GroupInfoQuery) -> GatewayOutcome {
        let request = self
            .client
            .get(self.url("/groups/info"))
            .query(&[("time_window", query.time_window.to_string())]);
        self.execute(GROUP_INFO, request).await
    }

    pub async fn association_rules(&self, query: &AssociationRulesQuery) -> GatewayOutcome {
        let request = self.client.get(self.url("/association-rules")).query(&[
            ("min_support", query.min_support.to_string()),
            ("min_confidence", query.min_confidence.to_string()),
            ("limit", query.limit.to_string()),
        ]);
        self.execute(ASSOCIATION_RULES, request).await
    }

    pub async fn product_analytics(&self) -> GatewayOutcome {
        let request = self.client.get(self.url("/analytics/products"));
        self.execute(PRODUCT_ANALYTICS, request).await
    }

    pub async fn predict(&self, input: &PredictionRequest) -> GatewayOutcome {
        let request = self.client.post(self.url("/predict")).json(input);
        self.execute(PREDICTION, request).await
    }

    async fn execute(&self, endpoint: Endpoint, request: RequestBuilder) -> GatewayOutcome {
        let timer = GATEWAY_REQUEST_DURATION_SECONDS
            .with_label_values(&[endpoint.name])
            .start_timer();
        let outcome = fetch(endpoint, request).await;
        timer.observe_duration();

        GATEWAY_REQUESTS_TOTAL
            .with_label_values(&[endpoint.name, outcome.label()])
            .inc();

        match &outcome {
            GatewayOutcome::Success(_) => {
                info!(endpoint = endpoint.name, "Recommendation gateway call succeeded")
            }
            GatewayOutcome::ClientError(message) => {
                warn!(
                    endpoint = endpoint.name,
                    reason = %message,
                    "Recommendation gateway returned no data"
                )
            }
            GatewayOutcome::ServerError(message) => {
                error!(
                    endpoint = endpoint.name,
                    reason = %message,
                    "Recommendation gateway call failed"
                )
            }
        }

        outcome
    }
}

async fn fetch(endpoint: Endpoint, request: RequestBuilder) -> GatewayOutcome {
    let server_error = |detail: String| {
        GatewayOutcome::ServerError(format!("{}: {}", endpoint.unreachable, detail))
    };

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return server_error(error_chain(&e)),
    };

    let status = response.status();
    if !status.is_success() {
        return server_error(format!("upstream responded with {}", status));
    }

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => return server_error(error_chain(&e)),
    };

    if body.iter().all(u8::is_ascii_whitespace) {
        return GatewayOutcome::ClientError(endpoint.unavailable.to_string());
    }

    match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Null) => GatewayOutcome::ClientError(endpoint.unavailable.to_string()),
        Ok(value) => GatewayOutcome::Success(value),
        Err(e) => server_error(format!("invalid JSON body: {}", e)),
    }
}

/// Render an error with all of its sources, e.g.
/// `error sending request: client error (Connect): Connection refused`.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
