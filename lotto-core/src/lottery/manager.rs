use crate::draws::DrawPublication;
use crate::error::Result;
use crate::lottery::LotteryConfig;
use crate::rounds::RoundManager;
use crate::storage::Storage;
use crate::tickets::{RawNumbers, TicketAdmission, TicketRequest};
use crate::types::{Caller, CloseOutcome, Draw, OpenOutcome, Round, RoundSummary, Ticket, TicketView};
use std::path::Path;
use std::sync::Arc;

/// Entry point for the application layer. Owns the store and the three
/// services that mutate it.
pub struct Lottery {
    config: LotteryConfig,
    rounds: RoundManager,
    tickets: TicketAdmission,
    draws: DrawPublication,
}

impl Lottery {
    pub async fn new(data_dir: &Path, config: LotteryConfig) -> Result<Self> {
        config.validate()?;

        let db_path = data_dir.join(&config.database_file);
        let storage = Arc::new(Storage::new(&db_path).await?);

        tracing::debug!("Opened lottery store at {}", db_path.display());

        Ok(Self {
            rounds: RoundManager::new(storage.clone()),
            tickets: TicketAdmission::new(storage.clone(), config.ticket_rules.clone()),
            draws: DrawPublication::new(
                storage,
                config.draw_validation,
                config.ticket_rules.clone(),
            ),
            config,
        })
    }

    pub fn config(&self) -> &LotteryConfig {
        &self.config
    }

    // Round lifecycle
    pub async fn open_new_round(&self, caller: &Caller) -> Result<OpenOutcome> {
        self.rounds.open_new_round(caller).await
    }

    pub async fn close_open_round(&self, caller: &Caller) -> Result<CloseOutcome> {
        self.rounds.close_open_round(caller).await
    }

    pub async fn get_open_round(&self) -> Result<Option<Round>> {
        self.rounds.get_open_round().await
    }

    pub async fn get_latest_round(&self) -> Result<Option<Round>> {
        self.rounds.get_latest_round().await
    }

    pub async fn list_rounds(&self, caller: &Caller) -> Result<Vec<RoundSummary>> {
        self.rounds.list_rounds(caller).await
    }

    // Tickets
    pub async fn submit_ticket(
        &self,
        personal_id: &str,
        numbers: impl Into<RawNumbers>,
        caller: &Caller,
    ) -> Result<Ticket> {
        let request = TicketRequest::new(personal_id, numbers);
        self.tickets.submit_ticket(&request, caller).await
    }

    pub async fn get_ticket_view(&self, ticket_id: &str) -> Result<TicketView> {
        self.tickets.get_ticket_view(ticket_id).await
    }

    pub async fn list_tickets(&self, round_id: i64, caller: &Caller) -> Result<Vec<Ticket>> {
        self.tickets.list_tickets(round_id, caller).await
    }

    // Draws
    pub async fn publish_draw(&self, numbers: impl Into<RawNumbers>, caller: &Caller) -> Result<Draw> {
        self.draws.publish_draw(&numbers.into(), caller).await
    }

    pub async fn get_draw(&self, round_id: i64) -> Result<Option<Draw>> {
        self.draws.get_draw(round_id).await
    }
}
