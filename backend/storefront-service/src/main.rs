//! Storefront Service - HTTP Server
//!
//! Serves the product catalog, publishes click events to Kafka and proxies
//! recommendation queries to the prediction service.

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use storefront_service::catalog::CATEGORY_TEMPLATES;
use storefront_service::config::LogFormat;
use storefront_service::handlers;
use storefront_service::kafka::{ClickEventPublisher, KafkaEventSink};
use storefront_service::services::RecommendationGateway;
use storefront_service::{AppState, Catalog, Config};

const KAFKA_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront_service=info,actix_web=info".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.app.log_format);

    info!(
        "Starting storefront-service v{} ({})",
        env!("CARGO_PKG_VERSION"),
        config.app.env
    );

    let mut rng = match config.catalog.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let catalog = Catalog::generate(CATEGORY_TEMPLATES, config.catalog.size, &mut rng)
        .context("Failed to generate product catalog")?;

    let sink = KafkaEventSink::new(&config.kafka).context("Failed to create Kafka producer")?;
    let publisher =
        ClickEventPublisher::new(Arc::new(sink), config.kafka.click_events_topic.clone());
    info!(topic = %publisher.topic(), "Click events will be published to Kafka");

    let gateway = RecommendationGateway::new(&config.gateway)
        .context("Failed to build recommendation gateway client")?;
    info!(base_url = %gateway.base_url(), "Recommendation gateway configured");

    let state = web::Data::new(AppState {
        catalog,
        publisher,
        gateway,
    });

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    info!("HTTP server listening on {}", http_bind_address);

    let server_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&http_bind_address)
    .with_context(|| format!("Failed to bind {}", http_bind_address))?
    .run()
    .await
    .context("HTTP server error")?;

    info!("Flushing pending click events");
    state.publisher.flush(KAFKA_FLUSH_TIMEOUT);

    info!("storefront-service shutting down");
    Ok(())
}
