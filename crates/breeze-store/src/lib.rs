//! SQLite-backed session history.
//!
//! The durable medium is a small key-value table; the full ordered history
//! (most recent first) is serialized as one JSON snapshot under a fixed key
//! and rewritten on every mutation. A malformed snapshot is discarded with a
//! warning, never a crash. The store also keeps the anonymous client
//! identifier forwarded to the remote document store.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

use breeze_core::domain::SessionRecord;
use breeze_core::flow::HistorySink;

const HISTORY_KEY: &str = "breathing_history";
const CLIENT_ID_KEY: &str = "client_id";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub struct HistoryStore {
    conn: Connection,
    records: Vec<SessionRecord>,
}

impl HistoryStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        // performance pragmas
        conn.pragma_update(None, "journal_mode", &"WAL")?;
        conn.pragma_update(None, "synchronous", &"NORMAL")?;
        Self::from_connection(conn)
    }

    /// Ephemeral store, used by tests and the demo command
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        let mut store = HistoryStore {
            conn,
            records: Vec::new(),
        };
        store.init_schema()?;
        store.records = store.load_snapshot()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn load_snapshot(&self) -> Result<Vec<SessionRecord>, StoreError> {
        let Some(raw) = self.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                log::warn!("discarding malformed history snapshot: {}", err);
                Ok(Vec::new())
            }
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        let snapshot = serde_json::to_string(&self.records)?;
        self.put(HISTORY_KEY, &snapshot)
    }

    /// Prepend a finished record and rewrite the snapshot.
    pub fn append(&mut self, record: SessionRecord) -> Result<(), StoreError> {
        self.records.insert(0, record);
        self.persist()
    }

    /// Ordered history, most recent first.
    pub fn list(&self) -> &[SessionRecord] {
        &self.records
    }

    /// Empty the history and remove the durable snapshot.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![HISTORY_KEY])?;
        Ok(())
    }

    /// Anonymous stable client identifier, created on first access and
    /// persisted alongside the history.
    pub fn client_id(&self) -> Result<String, StoreError> {
        if let Some(id) = self.get(CLIENT_ID_KEY)? {
            return Ok(id);
        }
        let id = Uuid::new_v4().to_string();
        self.put(CLIENT_ID_KEY, &id)?;
        Ok(id)
    }
}

impl HistorySink for HistoryStore {
    fn append(&mut self, record: &SessionRecord) -> Result<(), String> {
        HistoryStore::append(self, record.clone()).map_err(|e| e.to_string())
    }
}
