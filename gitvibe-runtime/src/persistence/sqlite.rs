//! SQLite implementation of `StateTier`.
//!
//! The primary tier: a transactional store that survives restarts. The
//! whole document lives in one row of a `kv` table; rusqlite calls are
//! synchronous, so they run under `tokio::task::spawn_blocking` to keep
//! the async runtime unblocked.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::{decode_state, StateTier};
use crate::demo::state::DemoState;
use crate::error::TierError;

/// Row key for the single demo document.
const STATE_KEY: &str = "demo_state";

pub struct SqliteTier {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTier {
    /// Open or create the database at the given path.
    ///
    /// The connection uses WAL journaling and a busy timeout so a
    /// concurrent reader never turns into a hard failure.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, TierError> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|error| {
                    TierError::storage(
                        "create database directory",
                        format!("{}: {}", parent.display(), error),
                    )
                })?;
            }
        }

        let conn = Connection::open(path_ref)
            .map_err(|error| TierError::storage("open database", error.to_string()))?;
        Self::prepare(conn)
    }

    /// Fully in-memory database, for tests.
    pub fn new_in_memory() -> Result<Self, TierError> {
        let conn = Connection::open_in_memory()
            .map_err(|error| TierError::storage("open database", error.to_string()))?;
        Self::prepare(conn)
    }

    fn prepare(conn: Connection) -> Result<Self, TierError> {
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|error| TierError::storage("set journal mode", error.to_string()))?;
        conn.pragma_update(None, "busy_timeout", 5000)
            .map_err(|error| TierError::storage("set busy timeout", error.to_string()))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .map_err(|error| TierError::storage("create schema", error.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl StateTier for SqliteTier {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn read(&self) -> Result<Option<DemoState>, TierError> {
        let conn = self.conn.clone();
        let raw: Option<String> = tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| TierError::storage("lock connection", "poisoned"))?;
            conn.query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![STATE_KEY],
                |row| row.get(0),
            )
            .optional()
            .map_err(|error| TierError::storage("read document", error.to_string()))
        })
        .await
        .map_err(|error| TierError::storage("join read task", error.to_string()))??;

        Ok(raw.and_then(|raw| decode_state(self.name(), &raw)))
    }

    async fn write(&self, state: &DemoState) -> Result<(), TierError> {
        let raw = serde_json::to_string(state)
            .map_err(|error| TierError::storage("encode document", error.to_string()))?;

        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| TierError::storage("lock connection", "poisoned"))?;
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![STATE_KEY, raw],
            )
            .map_err(|error| TierError::storage("write document", error.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|error| TierError::storage("join write task", error.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::seed::seeded_state;

    #[tokio::test]
    async fn test_read_returns_none_for_fresh_database() {
        let tier = SqliteTier::new_in_memory().expect("open in-memory db");
        assert!(tier.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_roundtrip() {
        let tier = SqliteTier::new_in_memory().expect("open in-memory db");
        let state = seeded_state();

        tier.write(&state).await.unwrap();
        let loaded = tier.read().await.unwrap().expect("document present");
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_write_upserts_single_row() {
        let tier = SqliteTier::new_in_memory().expect("open in-memory db");
        let mut state = seeded_state();

        tier.write(&state).await.unwrap();
        state.repos.truncate(1);
        tier.write(&state).await.unwrap();

        let loaded = tier.read().await.unwrap().expect("document present");
        assert_eq!(loaded.repos.len(), 1);
    }

    #[tokio::test]
    async fn test_persistence_survives_reload() {
        let db_path = std::env::temp_dir().join(format!(
            "gitvibe_sqlite_tier_{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&db_path);

        let state = seeded_state();
        {
            let tier = SqliteTier::new(&db_path).expect("open db");
            tier.write(&state).await.unwrap();
        }

        {
            let tier = SqliteTier::new(&db_path).expect("reopen db");
            let loaded = tier.read().await.unwrap().expect("document present");
            assert_eq!(loaded, state);
        }

        let _ = std::fs::remove_file(&db_path);
    }
}
