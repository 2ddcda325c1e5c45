//! In-memory player store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::player::{Lookup, Pid, Player, PlayerStore, StoreError};

/// Fixed set of player records held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPlayerStore {
    players: Arc<Vec<Player>>,
}

impl MemoryPlayerStore {
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            players: Arc::new(players),
        }
    }
}

#[async_trait]
impl PlayerStore for MemoryPlayerStore {
    async fn find_by_pid(&self, pid: Pid) -> Result<Lookup, StoreError> {
        let mut records: Vec<Player> = self
            .players
            .iter()
            .filter(|p| p.pid == pid)
            .cloned()
            .collect();
        records.sort_by_key(|p| p.provider);
        Ok(Lookup::from_records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use chrono::Utc;

    #[tokio::test]
    async fn test_find_by_pid() {
        let store = MemoryPlayerStore::new(vec![
            Player {
                pid: 1,
                nick: "walterwhite".into(),
                provider: Provider::BF2Hub,
                imported: Utc::now(),
            },
            Player {
                pid: 2,
                nick: "jessepinkman".into(),
                provider: Provider::OpenSpy,
                imported: Utc::now(),
            },
            Player {
                pid: 2,
                nick: "capncook".into(),
                provider: Provider::PlayBF2,
                imported: Utc::now(),
            },
        ]);

        match store.find_by_pid(1).await.unwrap() {
            Lookup::Found(p) => assert_eq!(p.nick, "walterwhite"),
            other => panic!("unexpected lookup: {:?}", other),
        }
        assert_eq!(store.find_by_pid(2).await.unwrap(), Lookup::MultipleFound);
        assert_eq!(store.find_by_pid(3).await.unwrap(), Lookup::NotFound);
    }
}
