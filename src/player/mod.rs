//! Player store contract.
//!
//! # Data Flow
//! ```text
//! resolver / verification engine / JSON API
//!     → PlayerStore::find_by_pid(pid)
//!     → Lookup::{Found, NotFound, MultipleFound}
//! ```
//!
//! # Design Decisions
//! - PIDs are only unique per provider; more than one record for a PID is
//!   reported as `MultipleFound`, never collapsed to an arbitrary record
//! - The gateway only reads; writes belong to the import job
//! - Backends: `sql` (MySQL via sea-orm) and `memory` (tests)

pub mod memory;
pub mod sql;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::provider::Provider;

pub use memory::MemoryPlayerStore;
pub use sql::SqlPlayerStore;

/// Numeric player identifier, unique within a provider's namespace.
pub type Pid = u64;

/// A player account known to one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub pid: Pid,
    pub nick: String,
    pub provider: Provider,
    pub imported: DateTime<Utc>,
}

/// Outcome of a PID lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(Player),
    NotFound,
    /// The PID exists under more than one provider.
    MultipleFound,
}

impl Lookup {
    pub fn from_records(mut records: Vec<Player>) -> Self {
        match records.len() {
            0 => Lookup::NotFound,
            1 => Lookup::Found(records.remove(0)),
            _ => Lookup::MultipleFound,
        }
    }
}

/// Errors raised by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("invalid player record: {0}")]
    InvalidRecord(String),

    #[error("invalid store configuration: {0}")]
    Config(String),
}

/// Read access to the player store.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    async fn find_by_pid(&self, pid: Pid) -> Result<Lookup, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(provider: Provider) -> Player {
        Player {
            pid: 1,
            nick: "walterwhite".into(),
            provider,
            imported: Utc::now(),
        }
    }

    #[test]
    fn test_lookup_from_records() {
        assert_eq!(Lookup::from_records(vec![]), Lookup::NotFound);

        let p = player(Provider::BF2Hub);
        assert_eq!(Lookup::from_records(vec![p.clone()]), Lookup::Found(p));

        let conflicting = vec![player(Provider::BF2Hub), player(Provider::OpenSpy)];
        assert_eq!(Lookup::from_records(conflicting), Lookup::MultipleFound);
    }
}
