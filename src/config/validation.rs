//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses parse and server IPs are unique
//! - Reject `unknown` wherever a concrete provider is required
//! - Validate value ranges (timeouts > 0, override URLs absolute http(s))
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;
use crate::provider::Provider;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    BindAddress(String),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("invalid server ip {0:?}")]
    ServerIp(String),

    #[error("duplicate server ip {0}")]
    DuplicateServer(IpAddr),

    #[error("server {0} is mapped to unknown provider")]
    UnknownServerProvider(String),

    #[error("default provider must not be unknown")]
    UnknownDefaultProvider,

    #[error("invalid base url for {provider}: {url:?}")]
    BaseUrl { provider: Provider, url: String },

    #[error("request timeout must be greater than zero")]
    RequestTimeout,

    #[error("database {0} must not be empty")]
    Database(&'static str),
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for server in &config.servers {
        match server.ip.parse::<IpAddr>() {
            Ok(ip) => {
                if !seen.insert(ip) {
                    errors.push(ValidationError::DuplicateServer(ip));
                }
            }
            Err(_) => errors.push(ValidationError::ServerIp(server.ip.clone())),
        }
        if server.provider == Provider::Unknown {
            errors.push(ValidationError::UnknownServerProvider(server.ip.clone()));
        }
    }

    if config.provider == Provider::Unknown {
        errors.push(ValidationError::UnknownDefaultProvider);
    }

    for (provider, ov) in &config.providers {
        if let Some(raw) = &ov.base_url {
            let valid = Url::parse(raw)
                .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
                .unwrap_or(false);
            if !valid {
                errors.push(ValidationError::BaseUrl {
                    provider: *provider,
                    url: raw.clone(),
                });
            }
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    if config.db.host.trim().is_empty() {
        errors.push(ValidationError::Database("host"));
    }
    if config.db.dbname.trim().is_empty() {
        errors.push(ValidationError::Database("dbname"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
