//! MySQL-backed player store.
//!
//! # Responsibilities
//! - Open the shared connection pool from config
//! - Load every record for a PID and classify the result
//!
//! # Design Decisions
//! - All rows for a PID are loaded so conflicts across providers surface as
//!   `MultipleFound` instead of silently picking the first row
//! - Small pool (2 connections): the gateway only performs single-row reads

use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DbBackend, FromQueryResult, Statement,
};
use url::Url;

use crate::config::schema::DatabaseConfig;
use crate::player::{Lookup, Pid, Player, PlayerStore, StoreError};
use crate::provider::Provider;

const FIND_BY_PID: &str = "SELECT CAST(pid AS SIGNED) AS pid, nick, CAST(provider AS SIGNED) AS provider, imported \
     FROM players WHERE pid = ? ORDER BY provider ASC";

#[derive(Debug, FromQueryResult)]
struct PlayerRow {
    pid: i64,
    nick: String,
    provider: i64,
    imported: chrono::NaiveDateTime,
}

impl TryFrom<PlayerRow> for Player {
    type Error = StoreError;

    fn try_from(row: PlayerRow) -> Result<Self, Self::Error> {
        let pid = Pid::try_from(row.pid)
            .map_err(|_| StoreError::InvalidRecord(format!("negative pid {}", row.pid)))?;
        let provider = i32::try_from(row.provider)
            .ok()
            .and_then(|code| Provider::try_from(code).ok())
            .ok_or_else(|| StoreError::InvalidRecord(format!("unknown provider code {}", row.provider)))?;

        Ok(Player {
            pid,
            nick: row.nick,
            provider,
            imported: row.imported.and_utc(),
        })
    }
}

/// Player store reading the `players` table.
#[derive(Debug, Clone)]
pub struct SqlPlayerStore {
    db: DatabaseConnection,
}

impl SqlPlayerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connect using the `db` section of the config.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = connection_url(config)?;
        let mut options = ConnectOptions::new(url.to_string());
        options
            .max_connections(2)
            .idle_timeout(Duration::from_secs(15 * 60))
            .sqlx_logging(false);

        tracing::info!(host = %config.host, dbname = %config.dbname, "Connecting to player database");
        let db = Database::connect(options).await?;
        Ok(Self::new(db))
    }
}

fn connection_url(config: &DatabaseConfig) -> Result<Url, StoreError> {
    let mut url = Url::parse(&format!("mysql://{}/{}", config.host, config.dbname))
        .map_err(|e| StoreError::Config(format!("invalid database address: {}", e)))?;
    // set_username/set_password percent-encode reserved characters
    if url.set_username(&config.user).is_err() || url.set_password(Some(&config.passwd)).is_err() {
        return Err(StoreError::Config("database address cannot carry credentials".into()));
    }
    Ok(url)
}

#[async_trait]
impl PlayerStore for SqlPlayerStore {
    async fn find_by_pid(&self, pid: Pid) -> Result<Lookup, StoreError> {
        let stmt = Statement::from_sql_and_values(DbBackend::MySql, FIND_BY_PID, [pid.into()]);
        let rows = PlayerRow::find_by_statement(stmt).all(&self.db).await?;

        let players = rows
            .into_iter()
            .map(Player::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Lookup::from_records(players))
    }
}
