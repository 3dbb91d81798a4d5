use std::net::IpAddr;

use crate::delivery::DeliveryPolicy;

/// Largest request body accepted, in bytes.
pub const MAX_PAYLOAD_BYTES: usize = 10_240;

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://decision-well.lovable.app",
    "https://corteza.app",
    "http://localhost:5173",
    "http://localhost:8080",
];

const DEFAULT_PREVIEW_SUFFIX: &str = ".lovable.app";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Downstream automation webhook. Submissions fail with 500 while unset.
    pub webhook_url: Option<String>,
    pub allowed_origins: Vec<String>,
    pub preview_suffix: String,
    pub log_level: String,
    pub delivery: DeliveryPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("RELAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid RELAY_HOST: {e}"))?;

        let port: u16 = env_or("RELAY_PORT", "8080")
            .parse()
            .map_err(|e| format!("Invalid RELAY_PORT: {e}"))?;

        let webhook_url = std::env::var("RELAY_WEBHOOK_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let allowed_origins = match std::env::var("RELAY_ALLOWED_ORIGINS") {
            Ok(raw) => parse_csv(&raw),
            Err(_) => DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let preview_suffix = env_or("RELAY_PREVIEW_SUFFIX", DEFAULT_PREVIEW_SUFFIX);
        let log_level = env_or("RELAY_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            webhook_url,
            allowed_origins,
            preview_suffix,
            log_level,
            delivery: DeliveryPolicy::default(),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
