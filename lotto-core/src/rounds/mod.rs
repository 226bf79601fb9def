//! Round lifecycle: `Open -> Closed`, with at most one open round at a time.
//!
//! The "current round" is always a query over the store, never cached. The
//! check-then-act in [`RoundManager::open_new_round`] runs inside one
//! immediate transaction and the schema carries a unique index over open
//! rounds, so concurrent opens cannot produce a second open round.

use crate::error::{LottoError, Result};
use crate::storage::{round_store, RoundStore, Storage};
use crate::types::{Caller, CloseOutcome, OpenOutcome, Round, RoundSummary};
use std::sync::Arc;

pub struct RoundManager {
    storage: Arc<Storage>,
}

impl RoundManager {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Open a new round unless one is already open. An already-open round is
    /// reported as `AlreadyOpen`, not as an error.
    pub async fn open_new_round(&self, caller: &Caller) -> Result<OpenOutcome> {
        require_admin(caller, "open a round")?;

        let outcome = self
            .storage
            .transaction(|tx| {
                if let Some(open) = round_store::find_open(tx)? {
                    return Ok(OpenOutcome::AlreadyOpen(open));
                }

                // Normally a no-op while the invariant holds
                let stale = round_store::close_open(tx)?;
                if stale > 0 {
                    tracing::warn!("Closed {} stale open round(s) before opening", stale);
                }

                let round = round_store::insert_open(tx)?;
                Ok(OpenOutcome::Opened(round))
            })
            .await?;

        match &outcome {
            OpenOutcome::Opened(round) => tracing::info!("Opened round {}", round.id),
            OpenOutcome::AlreadyOpen(round) => {
                tracing::debug!("Round {} already open, nothing to do", round.id)
            }
        }

        Ok(outcome)
    }

    /// Close the open round, if any. With no open round this is a no-op
    /// reported as `AlreadyClosed`.
    pub async fn close_open_round(&self, caller: &Caller) -> Result<CloseOutcome> {
        require_admin(caller, "close a round")?;

        let outcome = self
            .storage
            .transaction(|tx| {
                let Some(open) = round_store::find_open(tx)? else {
                    return Ok(CloseOutcome::AlreadyClosed);
                };

                round_store::close_open(tx)?;
                Ok(CloseOutcome::Closed(Round {
                    is_open: false,
                    ..open
                }))
            })
            .await?;

        match &outcome {
            CloseOutcome::Closed(round) => tracing::info!("Closed round {}", round.id),
            CloseOutcome::AlreadyClosed => tracing::debug!("No open round to close"),
        }

        Ok(outcome)
    }

    pub async fn get_open_round(&self) -> Result<Option<Round>> {
        RoundStore::new(&self.storage).open_round().await
    }

    pub async fn get_latest_round(&self) -> Result<Option<Round>> {
        RoundStore::new(&self.storage).latest_round().await
    }

    pub async fn list_rounds(&self, caller: &Caller) -> Result<Vec<RoundSummary>> {
        require_admin(caller, "list rounds")?;
        RoundStore::new(&self.storage).list_summaries().await
    }
}

pub(crate) fn require_admin(caller: &Caller, action: &str) -> Result<()> {
    if caller.is_admin {
        return Ok(());
    }

    tracing::warn!(
        "Rejected non-admin caller {:?} trying to {}",
        caller.identity,
        action
    );
    Err(LottoError::unauthorized(format!(
        "administrator rights required to {}",
        action
    )))
}
