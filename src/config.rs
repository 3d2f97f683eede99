use anyhow::Result;
use dotenvy::dotenv;
use std::collections::HashSet;
use std::env;

use crate::simulation::{LatencyRange, DEFAULT_LATENCY_MAX_MS, DEFAULT_LATENCY_MIN_MS};

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: Option<String>,
    pub test_cards: HashSet<String>,
    pub cors_allowed_origins: Vec<String>,
    pub admin_credentials: Option<AdminCredentials>,
    pub log_request_body: bool,
    pub log_format: LogFormat,
    pub latency: LatencyRange,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        let latency = LatencyRange {
            min_ms: parse_or("SIMULATED_LATENCY_MIN_MS", DEFAULT_LATENCY_MIN_MS)?,
            max_ms: parse_or("SIMULATED_LATENCY_MAX_MS", DEFAULT_LATENCY_MAX_MS)?,
        };
        if latency.max_ms < latency.min_ms {
            anyhow::bail!(
                "SIMULATED_LATENCY_MAX_MS ({}) must not be below SIMULATED_LATENCY_MIN_MS ({})",
                latency.max_ms,
                latency.min_ms
            );
        }

        let admin_credentials = env::var("ADMIN_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty())
            .map(|password| AdminCredentials {
                username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
                password,
            });

        Ok(Config {
            server_port: parse_or("SERVER_PORT", 8080)?,
            database_url: env::var("DATABASE_URL").ok().filter(|u| !u.is_empty()),
            test_cards: parse_test_cards(&env::var("PAYMENT_TEST_CARDS").unwrap_or_default()),
            cors_allowed_origins: parse_list(
                &env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
            ),
            admin_credentials,
            log_request_body: parse_or("LOG_REQUEST_BODY", false)?,
            log_format: parse_log_format(&env::var("LOG_FORMAT").unwrap_or_default())?,
            latency,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e)),
        _ => Ok(default),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comma-delimited allow-list. An empty value yields an empty set.
pub fn parse_test_cards(raw: &str) -> HashSet<String> {
    parse_list(raw).into_iter().collect()
}

fn parse_log_format(raw: &str) -> Result<LogFormat> {
    match raw.trim().to_lowercase().as_str() {
        "" | "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => anyhow::bail!("LOG_FORMAT must be 'text' or 'json', got '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_test_cards() {
        let cards = parse_test_cards("4111111111111111, 5555555555554444,,");
        assert_eq!(cards.len(), 2);
        assert!(cards.contains("4111111111111111"));
        assert!(cards.contains("5555555555554444"));
    }

    #[test]
    fn test_empty_test_cards_is_valid() {
        assert!(parse_test_cards("").is_empty());
        assert!(parse_test_cards(" , ").is_empty());
    }

    #[test]
    fn test_parse_cors_origins() {
        assert_eq!(
            parse_list(DEFAULT_CORS_ORIGINS),
            vec!["http://localhost:3000", "http://localhost:8080"]
        );
    }

    #[test]
    fn test_parse_log_format() {
        assert_eq!(parse_log_format("").unwrap(), LogFormat::Text);
        assert_eq!(parse_log_format("JSON").unwrap(), LogFormat::Json);
        assert!(parse_log_format("xml").is_err());
    }
}
