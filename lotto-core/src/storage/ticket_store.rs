use crate::error::Result;
use crate::storage::{json_column, timestamp_to_datetime, Storage};
use crate::types::Ticket;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

pub struct TicketStore<'a> {
    storage: &'a Storage,
}

impl<'a> TicketStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn load_ticket(&self, ticket_id: &Uuid) -> Result<Option<Ticket>> {
        let conn = self.storage.get_connection().await;

        let ticket = conn
            .query_row(
                "SELECT id, created_at, personal_id, numbers, round_id, submitter
                 FROM tickets WHERE id = ?1",
                params![ticket_id.to_string()],
                ticket_from_row,
            )
            .optional()?;

        Ok(ticket)
    }

    /// Tickets of a round in submission order
    pub async fn list_for_round(&self, round_id: i64) -> Result<Vec<Ticket>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT id, created_at, personal_id, numbers, round_id, submitter
             FROM tickets WHERE round_id = ?1 ORDER BY created_at ASC, rowid ASC",
        )?;

        let ticket_iter = stmt.query_map(params![round_id], ticket_from_row)?;

        let mut tickets = Vec::new();
        for ticket in ticket_iter {
            tickets.push(ticket?);
        }

        Ok(tickets)
    }
}

fn ticket_from_row(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    let id_str: String = row.get(0)?;
    let numbers_str: String = row.get(3)?;

    let id = Uuid::parse_str(&id_str).map_err(|_| {
        rusqlite::Error::InvalidColumnType(0, "id".to_string(), rusqlite::types::Type::Text)
    })?;

    Ok(Ticket {
        id,
        created_at: timestamp_to_datetime(row.get(1)?),
        personal_id: row.get(2)?,
        numbers: json_column(3, "numbers", &numbers_str)?,
        round_id: row.get(4)?,
        submitter: row.get(5)?,
    })
}

pub(crate) fn insert(conn: &Connection, ticket: &Ticket) -> Result<()> {
    let numbers_json = serde_json::to_string(&ticket.numbers)?;

    conn.execute(
        "INSERT INTO tickets (id, created_at, personal_id, numbers, round_id, submitter)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            ticket.id.to_string(),
            ticket.created_at.timestamp_millis(),
            ticket.personal_id,
            numbers_json,
            ticket.round_id,
            ticket.submitter,
        ],
    )?;

    Ok(())
}
