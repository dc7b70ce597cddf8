//! Configuration management for storefront-service
//!
//! Loads configuration from environment variables with sensible defaults.
//! Malformed values are rejected instead of silently replaced.

use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::catalog::DEFAULT_CATALOG_SIZE;

#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppConfig,
    pub catalog: CatalogConfig,
    pub kafka: KafkaConfig,
    pub gateway: GatewayConfig,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub size: usize,
    /// Fixed RNG seed; unset means a fresh catalog per process
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct KafkaConfig {
    pub brokers: String,
    pub click_events_topic: String,
    pub message_timeout_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl GatewayConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout_secs: 5,
            read_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let log_format = match var("LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "text" | "" => LogFormat::Text,
            other => bail!("LOG_FORMAT must be `text` or `json`, got `{}`", other),
        };

        let size = parse(&lookup, "CATALOG_SIZE", DEFAULT_CATALOG_SIZE)?;
        if size == 0 {
            bail!("CATALOG_SIZE must be greater than zero");
        }
        let seed = match lookup("CATALOG_SEED") {
            Some(raw) => Some(
                raw.trim()
                    .parse()
                    .with_context(|| format!("Invalid CATALOG_SEED: {}", raw))?,
            ),
            None => None,
        };

        let gateway_defaults = GatewayConfig::default();
        let base_url = var("RECOMMENDATION_SERVICE_URL", &gateway_defaults.base_url)
            .trim_end_matches('/')
            .to_string();

        Ok(Config {
            app: AppConfig {
                host: var("STOREFRONT_HOST", "0.0.0.0"),
                port: parse(&lookup, "STOREFRONT_PORT", 8080)?,
                env: var("APP_ENV", "development"),
                log_format,
            },
            catalog: CatalogConfig { size, seed },
            kafka: KafkaConfig {
                brokers: var("KAFKA_BROKERS", "localhost:9092"),
                click_events_topic: var("KAFKA_CLICK_EVENTS_TOPIC", "click-events"),
                message_timeout_ms: parse(&lookup, "KAFKA_MESSAGE_TIMEOUT_MS", 5000)?,
            },
            gateway: GatewayConfig {
                base_url,
                connect_timeout_secs: parse(
                    &lookup,
                    "RECOMMENDATION_CONNECT_TIMEOUT_SECS",
                    gateway_defaults.connect_timeout_secs,
                )?,
                read_timeout_secs: parse(
                    &lookup,
                    "RECOMMENDATION_READ_TIMEOUT_SECS",
                    gateway_defaults.read_timeout_secs,
                )?,
            },
        })
    }
}

fn parse<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {}", key, raw)),
        None => Ok(default),
    }
}
