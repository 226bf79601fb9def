use crate::error::Result;
use crate::storage::{now, timestamp_to_datetime, Storage};
use crate::types::{Round, RoundSummary};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ROUND_COLUMNS: &str = "id, created_at, is_open";

pub struct RoundStore<'a> {
    storage: &'a Storage,
}

impl<'a> RoundStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn open_round(&self) -> Result<Option<Round>> {
        let conn = self.storage.get_connection().await;
        find_open(&conn)
    }

    pub async fn latest_round(&self) -> Result<Option<Round>> {
        let conn = self.storage.get_connection().await;
        find_latest(&conn)
    }

    pub async fn load_round(&self, round_id: i64) -> Result<Option<Round>> {
        let conn = self.storage.get_connection().await;
        find_by_id(&conn, round_id)
    }

    #[cfg(test)]
    pub(crate) async fn count_open(&self) -> Result<u64> {
        let conn = self.storage.get_connection().await;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM rounds WHERE is_open = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// All rounds, newest first, with ticket counts and draw presence
    pub async fn list_summaries(&self) -> Result<Vec<RoundSummary>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT r.id, r.created_at, r.is_open,
                    (SELECT COUNT(*) FROM tickets t WHERE t.round_id = r.id),
                    EXISTS (SELECT 1 FROM draws d WHERE d.round_id = r.id)
             FROM rounds r ORDER BY r.id DESC",
        )?;

        let summary_iter = stmt.query_map([], |row| {
            let ticket_count: i64 = row.get(3)?;
            Ok(RoundSummary {
                round: round_from_row(row)?,
                ticket_count: ticket_count as u64,
                has_draw: row.get(4)?,
            })
        })?;

        let mut summaries = Vec::new();
        for summary in summary_iter {
            summaries.push(summary?);
        }

        Ok(summaries)
    }
}

fn round_from_row(row: &Row<'_>) -> rusqlite::Result<Round> {
    Ok(Round {
        id: row.get(0)?,
        created_at: timestamp_to_datetime(row.get(1)?),
        is_open: row.get(2)?,
    })
}

pub(crate) fn find_open(conn: &Connection) -> Result<Option<Round>> {
    let round = conn
        .query_row(
            &format!("SELECT {ROUND_COLUMNS} FROM rounds WHERE is_open = 1 ORDER BY id DESC LIMIT 1"),
            [],
            round_from_row,
        )
        .optional()?;
    Ok(round)
}

pub(crate) fn find_latest(conn: &Connection) -> Result<Option<Round>> {
    let round = conn
        .query_row(
            &format!("SELECT {ROUND_COLUMNS} FROM rounds ORDER BY id DESC LIMIT 1"),
            [],
            round_from_row,
        )
        .optional()?;
    Ok(round)
}

pub(crate) fn find_by_id(conn: &Connection, round_id: i64) -> Result<Option<Round>> {
    let round = conn
        .query_row(
            &format!("SELECT {ROUND_COLUMNS} FROM rounds WHERE id = ?1"),
            params![round_id],
            round_from_row,
        )
        .optional()?;
    Ok(round)
}

/// Close every open round. Returns how many rows flipped.
pub(crate) fn close_open(conn: &Connection) -> Result<usize> {
    let closed = conn.execute("UPDATE rounds SET is_open = 0 WHERE is_open = 1", [])?;
    Ok(closed)
}

pub(crate) fn insert_open(conn: &Connection) -> Result<Round> {
    let created_at = now();
    conn.execute(
        "INSERT INTO rounds (created_at, is_open) VALUES (?1, 1)",
        params![created_at.timestamp_millis()],
    )?;

    Ok(Round {
        id: conn.last_insert_rowid(),
        created_at,
        is_open: true,
    })
}
