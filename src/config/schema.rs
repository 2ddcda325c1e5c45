//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from the YAML file.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::provider::Provider;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Player store connection.
    pub db: DatabaseConfig,

    /// Game servers with a fixed provider.
    pub servers: Vec<ServerConfig>,

    /// Provider used when neither player nor server determine one.
    pub provider: Provider,

    /// Startup overrides of the built-in provider capabilities.
    pub providers: HashMap<Provider, ProviderOverride>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            db: DatabaseConfig::default(),
            servers: Vec::new(),
            provider: Provider::BF2Hub,
            providers: HashMap::new(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// MySQL connection settings.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `host:port` of the database server.
    pub host: String,
    pub dbname: String,
    pub user: String,
    pub passwd: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost:3306".to_string(),
            dbname: "playerpath".to_string(),
            user: String::new(),
            passwd: String::new(),
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("passwd", &"<redacted>")
            .finish()
    }
}

/// A game server pinned to a provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server IP address as seen by the gateway.
    pub ip: String,
    pub provider: Provider,
}

/// Startup override for a single provider.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderOverride {
    /// Replacement base address (absolute http/https URL).
    pub base_url: Option<String>,

    /// Switch the provider's native player verification on or off.
    pub native_verification: Option<bool>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (store lookup plus upstream call) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 10 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
