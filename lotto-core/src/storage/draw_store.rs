use crate::error::{LottoError, Result};
use crate::storage::{is_unique_violation, json_column, timestamp_to_datetime, Storage};
use crate::types::Draw;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

pub struct DrawStore<'a> {
    storage: &'a Storage,
}

impl<'a> DrawStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn load_for_round(&self, round_id: i64) -> Result<Option<Draw>> {
        let conn = self.storage.get_connection().await;
        find_for_round(&conn, round_id)
    }
}

fn draw_from_row(row: &Row<'_>) -> rusqlite::Result<Draw> {
    let id_str: String = row.get(0)?;
    let numbers_str: String = row.get(1)?;

    let id = Uuid::parse_str(&id_str).map_err(|_| {
        rusqlite::Error::InvalidColumnType(0, "id".to_string(), rusqlite::types::Type::Text)
    })?;

    Ok(Draw {
        id,
        numbers: json_column(1, "numbers", &numbers_str)?,
        created_at: timestamp_to_datetime(row.get(2)?),
        round_id: row.get(3)?,
    })
}

pub(crate) fn find_for_round(conn: &Connection, round_id: i64) -> Result<Option<Draw>> {
    let draw = conn
        .query_row(
            "SELECT id, numbers, created_at, round_id FROM draws WHERE round_id = ?1",
            params![round_id],
            draw_from_row,
        )
        .optional()?;
    Ok(draw)
}

/// Insert a draw. A second draw for the same round is rejected by the
/// `round_id` uniqueness constraint and reported as `DrawAlreadyExists`.
pub(crate) fn insert(conn: &Connection, draw: &Draw) -> Result<()> {
    let numbers_json = serde_json::to_string(&draw.numbers)?;

    conn.execute(
        "INSERT INTO draws (id, numbers, created_at, round_id) VALUES (?1, ?2, ?3, ?4)",
        params![
            draw.id.to_string(),
            numbers_json,
            draw.created_at.timestamp_millis(),
            draw.round_id,
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            LottoError::DrawAlreadyExists {
                round_id: draw.round_id,
            }
        } else {
            LottoError::Storage(e)
        }
    })?;

    Ok(())
}
