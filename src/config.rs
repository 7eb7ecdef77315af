//! Configuration loading and management
//!
//! The whole application is configured by one [`AppConfig`] value, loaded
//! at startup and never mutated afterwards. Handlers receive it through
//! request state, not through process globals.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host (overridden by the `HOST` environment variable)
    pub host: String,

    /// Bind port (overridden by the `PORT` environment variable)
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Resolve the bind address, honoring `HOST`/`PORT` env overrides.
    pub fn bind_addr(&self) -> String {
        let host = std::env::var("HOST").unwrap_or_else(|_| self.host.clone());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(self.port);
        format!("{}:{}", host, port)
    }
}

/// JWT signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub secret: String,

    /// Token lifetime in hours
    pub token_expiry_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: "change-me".to_string(),
            token_expiry_hours: 24,
        }
    }
}

/// How the Filter Parser treats malformed caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Malformed filter JSON is a no-op; clauses naming unknown columns
    /// and malformed `between` ranges are dropped.
    #[default]
    Lenient,

    /// The same conditions reject the request with a validation error.
    Strict,
}

/// Query-engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Malformed-filter policy
    pub filter_mode: FilterMode,

    /// Hard ceiling on the `limit` query parameter
    pub max_limit: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            filter_mode: FilterMode::Lenient,
            max_limit: 100,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub query: QueryConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}
