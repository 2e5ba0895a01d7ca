//! Configuration management for the tools server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (optionally via a `.env` file) or defaults. It is
//! loaded once at startup and passed explicitly to whatever needs it.

use super::transport::HttpConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default base URL of the Bring address API.
pub const DEFAULT_BRING_BASE_URL: &str = "https://api.bring.com";

/// Main configuration structure for the tools server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP transport configuration.
    pub transport: HttpConfig,

    /// Bring address API configuration.
    pub bring: BringConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for the Bring address API.
#[derive(Clone, Serialize, Deserialize)]
pub struct BringConfig {
    /// Scheme and host of the API, without a trailing path.
    pub base_url: String,

    /// Value of the `X-Mybring-API-Uid` header.
    pub api_uid: Option<String>,

    /// Value of the `X-Mybring-API-Key` header.
    pub api_key: Option<String>,

    /// Refuse to call the API when either credential is missing.
    /// When false, missing credentials are sent as empty headers.
    pub require_credentials: bool,

    /// Request timeout in seconds. `None` keeps the client default.
    pub timeout_secs: Option<u64>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for BringConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BringConfig")
            .field("base_url", &self.base_url)
            .field("api_uid", &self.api_uid.as_ref().map(|_| "[REDACTED]"))
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("require_credentials", &self.require_credentials)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl BringConfig {
    /// Returns `true` if both credentials are set and non-empty.
    pub fn has_credentials(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.api_uid) && present(&self.api_key)
    }
}

impl Default for BringConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BRING_BASE_URL.to_string(),
            api_uid: None,
            api_key: None,
            require_credentials: false,
            timeout_secs: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "address-tools".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: HttpConfig::default(),
            bring: BringConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    /// Variable names: `SERVER_NAME`, `LOG_LEVEL`, `HOST`, `PORT`, `CORS`,
    /// `API_UID`, `API_KEY`, `BRING_API_BASE_URL`,
    /// `BRING_REQUIRE_CREDENTIALS`, `BRING_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = HttpConfig::from_env();

        if let Ok(base_url) = std::env::var("BRING_API_BASE_URL") {
            config.bring.base_url = base_url.trim_end_matches('/').to_string();
        }

        config.bring.api_uid = std::env::var("API_UID").ok();
        config.bring.api_key = std::env::var("API_KEY").ok();

        if let Ok(strict) = std::env::var("BRING_REQUIRE_CREDENTIALS") {
            config.bring.require_credentials = parse_flag(&strict).unwrap_or(false);
        }

        if let Ok(timeout) = std::env::var("BRING_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.bring.timeout_secs = Some(secs),
                Err(_) => warn!("Ignoring invalid BRING_TIMEOUT_SECS: {}", timeout),
            }
        }

        if config.bring.has_credentials() {
            info!("Bring API credentials loaded from environment");
        } else if config.bring.require_credentials {
            warn!("API_UID/API_KEY not set - address lookups will be refused");
        } else {
            warn!("API_UID/API_KEY not set - Bring requests will carry empty credentials");
        }

        config
    }
}

/// Parse a boolean-ish environment value.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
