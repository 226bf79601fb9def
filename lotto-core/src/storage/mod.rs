pub mod draw_store;
pub mod round_store;
pub mod ticket_store;

pub use draw_store::DrawStore;
pub use round_store::RoundStore;
pub use ticket_store::TicketStore;

use crate::error::{LottoError, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use std::path::Path;
use tokio::sync::Mutex;

pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub async fn new(db_path: &Path) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LottoError::internal(format!("Failed to create directory: {}", e)))?;
        }

        let conn = Connection::open(db_path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };

        storage.init_schema().await?;
        Ok(storage)
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().await;

        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        // Rounds table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS rounds (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at INTEGER NOT NULL,
                is_open INTEGER NOT NULL CHECK (is_open IN (0, 1))
            )",
            [],
        )?;

        // At most one open round, enforced by the store
        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS rounds_single_open
             ON rounds (is_open) WHERE is_open = 1",
            [],
        )?;

        // Tickets table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS tickets (
                id TEXT PRIMARY KEY,
                created_at INTEGER NOT NULL,
                personal_id TEXT NOT NULL,
                numbers TEXT NOT NULL,
                round_id INTEGER NOT NULL,
                submitter TEXT,
                FOREIGN KEY (round_id) REFERENCES rounds(id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS tickets_round ON tickets (round_id)",
            [],
        )?;

        // Draws table, one per round
        conn.execute(
            "CREATE TABLE IF NOT EXISTS draws (
                id TEXT PRIMARY KEY,
                numbers TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                round_id INTEGER NOT NULL UNIQUE,
                FOREIGN KEY (round_id) REFERENCES rounds(id)
            )",
            [],
        )?;

        Ok(())
    }

    pub async fn get_connection(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction. The write lock is taken
    /// up front so a check-then-act sequence cannot interleave with another
    /// writer, even one in a different process. Commits on `Ok`, rolls back on
    /// `Err`.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
            && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}

/// Current time at the millisecond precision the store keeps
pub(crate) fn now() -> DateTime<Utc> {
    timestamp_to_datetime(Utc::now().timestamp_millis())
}

pub(crate) fn timestamp_to_datetime(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(timestamp).unwrap_or_else(Utc::now)
}

pub(crate) fn json_column<T: serde::de::DeserializeOwned>(
    idx: usize,
    name: &str,
    raw: &str,
) -> rusqlite::Result<T> {
    serde_json::from_str(raw).map_err(|_| {
        rusqlite::Error::InvalidColumnType(idx, name.to_string(), rusqlite::types::Type::Text)
    })
}
