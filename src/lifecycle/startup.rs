//! Startup orchestration.
//!
//! # Responsibilities
//! - Freeze the provider table and server mapping from config
//! - Connect the player store and build shared state
//! - Start the metrics endpoint, bind the listener and serve
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::asp;
use crate::config::GatewayConfig;
use crate::http::{AppState, Forwarder, HttpServer};
use crate::lifecycle::Shutdown;
use crate::modify::ModifierChain;
use crate::observability::metrics;
use crate::player::{PlayerStore, SqlPlayerStore, StoreError};
use crate::provider::{ProviderTable, Resolver, ServerMapping};
use crate::verify::Verifier;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("player store: {0}")]
    Store(#[from] StoreError),

    #[error("provider base url: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid server ip {ip:?}")]
    ServerIp { ip: String },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("metrics: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("server: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the static game server table.
pub fn server_mapping(config: &GatewayConfig) -> Result<ServerMapping, StartupError> {
    config
        .servers
        .iter()
        .map(|server| {
            server
                .ip
                .parse::<IpAddr>()
                .map(|ip| (ip, server.provider))
                .map_err(|_| StartupError::ServerIp { ip: server.ip.clone() })
        })
        .collect()
}

/// Wire shared request state around the given store.
pub fn build_state(config: &GatewayConfig, store: Arc<dyn PlayerStore>) -> Result<AppState, StartupError> {
    let providers = Arc::new(ProviderTable::new(&config.providers)?);
    let servers = server_mapping(config)?;
    let resolver = Arc::new(Resolver::new(store.clone(), servers, config.provider));
    let verifier = Arc::new(Verifier::new(store.clone(), resolver.clone(), providers.clone()));
    let forwarder = Arc::new(Forwarder::new(providers, ModifierChain::standard())?);

    Ok(AppState {
        store,
        resolver,
        verifier,
        forwarder,
        clock: asp::timestamp,
    })
}

/// Run the gateway until `shutdown` fires.
pub async fn run(config: GatewayConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let store: Arc<dyn PlayerStore> = Arc::new(SqlPlayerStore::connect(&config.db).await?);
    tracing::info!(host = %config.db.host, dbname = %config.db.dbname, "Connected to player store");

    let state = build_state(&config, store)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    tracing::info!(
        default_provider = %config.provider,
        servers = config.servers.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Gateway configured"
    );

    HttpServer::new(state, Duration::from_secs(config.timeouts.request_secs))
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
