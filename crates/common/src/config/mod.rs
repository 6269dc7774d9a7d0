//! Configuration management for litgraph services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream bibliographic service configuration
    #[serde(default)]
    pub academic: AcademicConfig,

    /// Search form defaults and bounds
    #[serde(default)]
    pub search: SearchConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AcademicConfig {
    /// Base URL of the knowledge-graph API (interpret/evaluate live under it)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Subscription key sent in the Ocp-Apim-Subscription-Key header.
    /// Must be supplied operationally; requests go out unauthenticated without it.
    pub subscription_key: Option<String>,

    /// Service model revision
    #[serde(default = "default_model")]
    pub model: String,

    /// Interpretation candidates requested per query
    #[serde(default = "default_interpret_count")]
    pub interpret_count: u32,

    /// Result cap for bulk evaluations (reference resolution, author mode)
    #[serde(default = "default_bulk_count")]
    pub bulk_count: u32,

    /// Attribute projection requested from the evaluator
    #[serde(default = "default_attributes")]
    pub attributes: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Query used when the request carries none (publication mode)
    #[serde(default = "default_query")]
    pub default_query: String,

    /// Query used when the request carries none (author mode)
    #[serde(default = "default_author_query")]
    pub default_author_query: String,

    /// Result count used when the request carries none
    #[serde(default = "default_count")]
    pub default_count: u32,

    /// Upper bound for the requested result count
    #[serde(default = "default_max_count")]
    pub max_count: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Prometheus metrics port (0 to disable)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_base_url() -> String {
    "https://api.labs.cognitive.microsoft.com/academic/v1.0".to_string()
}
fn default_model() -> String { "latest".to_string() }
fn default_interpret_count() -> u32 { 100 }
fn default_bulk_count() -> u32 { 1000 }
fn default_attributes() -> String {
    "Id,DN,Y,CC,J.JN,AA.AuId,AA.DAuN,AA.DAfN,RId,DOI".to_string()
}
fn default_timeout() -> u64 { 30 }
fn default_query() -> String { "metasurface".to_string() }
fn default_author_query() -> String { "federico capasso".to_string() }
fn default_count() -> u32 { 20 }
fn default_max_count() -> u32 { 100 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_metrics_port() -> u16 { 9090 }
fn default_service_name() -> String { "litgraph".to_string() }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with APP__ prefix
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Upstream request timeout as Duration
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.academic.timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            academic: AcademicConfig::default(),
            search: SearchConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AcademicConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            subscription_key: None,
            model: default_model(),
            interpret_count: default_interpret_count(),
            bulk_count: default_bulk_count(),
            attributes: default_attributes(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_query: default_query(),
            default_author_query: default_author_query(),
            default_count: default_count(),
            max_count: default_max_count(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_port: default_metrics_port(),
            service_name: default_service_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.academic.model, "latest");
        assert_eq!(config.academic.bulk_count, 1000);
        assert_eq!(config.search.default_query, "metasurface");
        assert_eq!(config.search.max_count, 100);
    }

    #[test]
    fn test_attribute_projection_covers_both_author_profiles() {
        // The evaluator projection must carry display and affiliation
        // attributes so both name profiles deserialize from one response.
        let config = AppConfig::default();
        for attr in ["AA.AuId", "AA.DAuN", "AA.DAfN", "RId", "DOI"] {
            assert!(config.academic.attributes.contains(attr), "missing {attr}");
        }
    }

    #[test]
    fn test_upstream_timeout() {
        let config = AppConfig::default();
        assert_eq!(config.upstream_timeout(), Duration::from_secs(30));
    }
}
