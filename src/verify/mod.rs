//! Player verification engine.
//!
//! # Data Flow
//! ```text
//! VerifyPlayer.aspx?auth=..&SoldierNick=..&pid=..
//!     → asp::VerifyQuery (literal parse, syntax error on failure)
//!     → PlayerStore::find_by_pid
//!         Found + owner verifies        → forward to owner
//!         Found + owner cannot verify   → local decision matrix
//!         NotFound / MultipleFound      → forward to server/default provider
//!                                         if it verifies, else unverified
//! ```
//!
//! # Design Decisions
//! - An unknown or conflicting PID is never treated as verified, so a
//!   non-verifying default provider cannot be used to bypass verification
//! - PID conflicts across providers are left to the fallback provider; there
//!   is no way to break the tie from outside
//! - Case-insensitive nick matching follows the record owner, not the
//!   provider the request would otherwise be routed to

pub mod verdict;

use std::net::IpAddr;
use std::sync::Arc;

use crate::asp::{Response, VerifyQuery};
use crate::observability::metrics;
use crate::player::{Lookup, PlayerStore, StoreError};
use crate::provider::{Provider, ProviderTable, Resolver};

pub use verdict::{add_invalid_prefix, Verdict};

/// What the HTTP layer should do with a verification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Let the provider answer authoritatively.
    Forward(Provider),
    /// Answer with a locally built protocol response.
    Respond(Response),
}

/// Decides between deferring and synthesizing verification results.
pub struct Verifier {
    store: Arc<dyn PlayerStore>,
    resolver: Arc<Resolver>,
    providers: Arc<ProviderTable>,
}

impl Verifier {
    pub fn new(store: Arc<dyn PlayerStore>, resolver: Arc<Resolver>, providers: Arc<ProviderTable>) -> Self {
        Self {
            store,
            resolver,
            providers,
        }
    }

    pub async fn verify(
        &self,
        raw_query: Option<&str>,
        client_ip: Option<IpAddr>,
        asof: i64,
    ) -> Result<Decision, StoreError> {
        let Some(claim) = raw_query.and_then(VerifyQuery::parse) else {
            metrics::record_verification("syntax_error");
            return Ok(Decision::Respond(Response::syntax_error(asof)));
        };

        match self.store.find_by_pid(claim.pid).await? {
            Lookup::Found(player) => {
                let caps = self.providers.get(player.provider);
                if caps.supports_verification() {
                    metrics::record_verification("forwarded");
                    return Ok(Decision::Forward(player.provider));
                }

                let (verdict, resp) = verdict::compare(
                    player.pid,
                    &player.nick,
                    claim.pid,
                    &claim.nick,
                    caps.allows_case_insensitive_login,
                    asof,
                );
                tracing::debug!(
                    pid = claim.pid,
                    provider = %player.provider,
                    verdict = %verdict,
                    "Verified player locally"
                );
                metrics::record_verification(verdict.as_str());
                Ok(Decision::Respond(resp))
            }
            Lookup::NotFound => Ok(self.defer_or_reject(&claim, client_ip, asof, "Player not found")),
            Lookup::MultipleFound => Ok(self.defer_or_reject(&claim, client_ip, asof, "Found multiple players")),
        }
    }

    fn defer_or_reject(&self, claim: &VerifyQuery, client_ip: Option<IpAddr>, asof: i64, reason: &str) -> Decision {
        let fallback = self.resolver.server_or_default(client_ip);
        if self.providers.get(fallback).supports_verification() {
            tracing::warn!(
                pid = claim.pid,
                provider = %fallback,
                "{}, deferring verification to fallback provider",
                reason
            );
            metrics::record_verification("forwarded");
            return Decision::Forward(fallback);
        }

        tracing::warn!(pid = claim.pid, "{}, treating as unverified", reason);
        metrics::record_verification("unverified");
        Decision::Respond(verdict::unverified(claim.pid, &claim.nick, asof))
    }
}
