//! Provider resolution.
//!
//! # Responsibilities
//! - Pick the provider for a request from pid and client IP
//! - Cascade: player record → server mapping → configured default
//!
//! # Design Decisions
//! - NotFound and MultipleFound defer to the next step instead of failing
//! - Every fallback step is logged; none of them change data
//! - Store failures propagate to the caller

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use crate::player::{Lookup, Pid, PlayerStore, StoreError};
use crate::provider::Provider;

/// Static game server IP → provider table.
#[derive(Debug, Clone, Default)]
pub struct ServerMapping {
    servers: HashMap<IpAddr, Provider>,
}

impl ServerMapping {
    pub fn new(servers: HashMap<IpAddr, Provider>) -> Self {
        Self { servers }
    }

    pub fn get(&self, ip: &IpAddr) -> Option<Provider> {
        self.servers.get(ip).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

impl FromIterator<(IpAddr, Provider)> for ServerMapping {
    fn from_iter<I: IntoIterator<Item = (IpAddr, Provider)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Decides which provider answers a request.
pub struct Resolver {
    store: Arc<dyn PlayerStore>,
    servers: ServerMapping,
    default_provider: Provider,
}

impl Resolver {
    pub fn new(store: Arc<dyn PlayerStore>, servers: ServerMapping, default_provider: Provider) -> Self {
        Self {
            store,
            servers,
            default_provider,
        }
    }

    /// Full cascade for per-player requests.
    pub async fn resolve(&self, pid: Option<Pid>, client_ip: Option<IpAddr>) -> Result<Provider, StoreError> {
        if let Some(pid) = pid {
            if let Some(provider) = self.player_provider(pid).await? {
                return Ok(provider);
            }
        }

        Ok(self.server_or_default(client_ip))
    }

    /// Server mapping, then the configured default.
    pub fn server_or_default(&self, client_ip: Option<IpAddr>) -> Provider {
        client_ip
            .and_then(|ip| self.server_provider(ip))
            .unwrap_or(self.default_provider)
    }

    async fn player_provider(&self, pid: Pid) -> Result<Option<Provider>, StoreError> {
        match self.store.find_by_pid(pid).await? {
            Lookup::Found(player) if player.provider == Provider::Unknown => {
                tracing::warn!(pid, "Player has no known provider, deferring provider selection");
                Ok(None)
            }
            Lookup::Found(player) => Ok(Some(player.provider)),
            Lookup::NotFound => {
                tracing::warn!(pid, "Player not found, deferring provider selection");
                Ok(None)
            }
            Lookup::MultipleFound => {
                tracing::warn!(pid, "Found multiple players, deferring provider selection");
                Ok(None)
            }
        }
    }

    fn server_provider(&self, ip: IpAddr) -> Option<Provider> {
        let provider = self.servers.get(&ip);
        // server list is optional
        if provider.is_none() && !self.servers.is_empty() {
            tracing::warn!(ip = %ip, "Server not configured, deferring provider selection");
        }
        provider
    }
}
