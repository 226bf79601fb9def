pub mod input;

pub use input::{RawNumbers, TicketRequest, ValidatedDrawInput, ValidatedTicketInput};

use crate::error::{LottoError, Result};
use crate::lottery::config::NumberRules;
use crate::rounds::require_admin;
use crate::storage::{self, draw_store, round_store, ticket_store, Storage, TicketStore};
use crate::types::{Caller, DrawStatus, Ticket, TicketView};
use std::sync::Arc;
use uuid::Uuid;

/// Admits tickets into the open round and serves the public ticket view
pub struct TicketAdmission {
    storage: Arc<Storage>,
    rules: NumberRules,
}

impl TicketAdmission {
    pub fn new(storage: Arc<Storage>, rules: NumberRules) -> Self {
        Self { storage, rules }
    }

    /// Admit a ticket into the currently open round. With no open round the
    /// request fails with `AdmissionClosed` whatever its content.
    pub async fn submit_ticket(&self, request: &TicketRequest, caller: &Caller) -> Result<Ticket> {
        let result = self
            .storage
            .transaction(|tx| {
                let round = round_store::find_open(tx)?.ok_or(LottoError::AdmissionClosed)?;
                let input = request.validate(&self.rules)?;

                let ticket = Ticket {
                    id: Uuid::new_v4(),
                    created_at: storage::now(),
                    personal_id: input.personal_id().to_string(),
                    numbers: input.numbers().to_vec(),
                    round_id: round.id,
                    submitter: caller.identity.clone(),
                };

                ticket_store::insert(tx, &ticket)?;
                Ok(ticket)
            })
            .await;

        match &result {
            Ok(ticket) => tracing::info!(
                "Admitted ticket {} into round {}",
                ticket.id,
                ticket.round_id
            ),
            Err(e) if e.is_validation() => tracing::warn!("Rejected ticket: {}", e),
            Err(e) => tracing::error!("Ticket submission failed: {}", e),
        }

        result
    }

    /// Public read path: the ticket, its round and the round's draw if any.
    /// `ticket_id` is the shareable reference; anything that does not name a
    /// stored ticket is `NotFound`.
    pub async fn get_ticket_view(&self, ticket_id: &str) -> Result<TicketView> {
        let not_found = || LottoError::not_found(format!("ticket {}", ticket_id));

        let id = Uuid::parse_str(ticket_id.trim()).map_err(|_| not_found())?;
        let ticket = TicketStore::new(&self.storage)
            .load_ticket(&id)
            .await?
            .ok_or_else(not_found)?;

        let conn = self.storage.get_connection().await;
        let round = round_store::find_by_id(&conn, ticket.round_id)?.ok_or_else(|| {
            LottoError::internal(format!(
                "ticket {} references missing round {}",
                ticket.id, ticket.round_id
            ))
        })?;

        let draw = match draw_store::find_for_round(&conn, round.id)? {
            Some(draw) => {
                let matched = ticket
                    .numbers
                    .iter()
                    .copied()
                    .filter(|n| draw.numbers.contains(&i64::from(*n)))
                    .collect();
                DrawStatus::Drawn {
                    numbers: draw.numbers,
                    matched,
                }
            }
            None => DrawStatus::NotYetDrawn,
        };

        tracing::debug!("Loaded view for ticket {}", ticket.id);
        Ok(TicketView {
            ticket,
            round,
            draw,
        })
    }

    pub async fn list_tickets(&self, round_id: i64, caller: &Caller) -> Result<Vec<Ticket>> {
        require_admin(caller, "list tickets")?;
        TicketStore::new(&self.storage).list_for_round(round_id).await
    }
}
