use std::env;
use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Credentials for the outbound messaging provider. Both credentials must be
/// present for real delivery; otherwise alerts are only logged.
#[derive(Debug, Clone, Default)]
pub struct TwilioConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    /// E.164 sender number, without any channel prefix.
    pub phone_number: String,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "text" or "json"
    pub log_format: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    pub twilio: TwilioConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a local `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let bind_raw = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        Ok(Self {
            database_url,
            bind_addr,
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            twilio: TwilioConfig {
                account_sid: non_empty("TWILIO_ACCOUNT_SID"),
                auth_token: non_empty("TWILIO_AUTH_TOKEN"),
                phone_number: env::var("TWILIO_PHONE_NUMBER").unwrap_or_default(),
            },
            telemetry: TelemetryConfig {
                log_format: env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
                otlp_endpoint: non_empty("OTEL_EXPORTER_OTLP_ENDPOINT"),
            },
        })
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
