//! Application configuration loaded from environment variables.

use std::time::Duration;

use orchestrator::{CatalogError, ProductCatalog};
use thiserror::Error;

/// Where the orchestrator gets its inventory and price data from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamMode {
    /// Real HTTP services at `INVENTORY_URL` and `PRICE_URL`.
    Http,
    /// Seeded in-memory services, for running the API on its own.
    Memory,
}

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid PRODUCT_CATALOG: {0}")]
    Catalog(#[from] CatalogError),
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `INVENTORY_URL`: inventory service base URL (default: `"http://localhost:5245/api"`)
/// - `PRICE_URL`: price service base URL (default: `"http://localhost:5046/api"`)
/// - `UPSTREAM_TIMEOUT_MS`: per-request deadline for upstream calls (default: `5000`)
/// - `PRODUCT_CATALOG`: optional `"1=Super Laptop;2=Gaming Mouse"`
/// - `UPSTREAM_MODE`: `http` or `memory` (default: `http`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub inventory_url: String,
    pub price_url: String,
    pub upstream_timeout: Duration,
    pub catalog: Option<ProductCatalog>,
    pub upstream_mode: UpstreamMode,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value })?,
            None => defaults.port,
        };

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_MS") {
            Some(value) => match value.parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "UPSTREAM_TIMEOUT_MS",
                        value,
                    });
                }
            },
            None => defaults.upstream_timeout,
        };

        let catalog = match lookup("PRODUCT_CATALOG") {
            Some(value) if !value.trim().is_empty() => Some(value.parse::<ProductCatalog>()?),
            _ => None,
        };

        let upstream_mode = match lookup("UPSTREAM_MODE").as_deref() {
            None | Some("http") => UpstreamMode::Http,
            Some("memory") => UpstreamMode::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "UPSTREAM_MODE",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            inventory_url: lookup("INVENTORY_URL").unwrap_or(defaults.inventory_url),
            price_url: lookup("PRICE_URL").unwrap_or(defaults.price_url),
            upstream_timeout,
            catalog,
            upstream_mode,
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            inventory_url: "http://localhost:5245/api".to_string(),
            price_url: "http://localhost:5046/api".to_string(),
            upstream_timeout: Duration::from_secs(5),
            catalog: None,
            upstream_mode: UpstreamMode::Http,
        }
    }
}
