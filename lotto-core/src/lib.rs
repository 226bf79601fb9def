//! Lotto core - round, ticket and draw lifecycle for a 6/45 numbers lottery
//!
//! Administrators open and close betting rounds and publish a round's winning
//! numbers once it is closed; participants submit tickets into the open round.
//! All state lives in a SQLite store and every mutation is a single
//! transaction, so the invariants hold across concurrent callers.

pub mod draws;
pub mod error;
pub mod lottery;
pub mod rounds;
pub mod storage;
pub mod tickets;
pub mod types;

pub use error::{LottoError, Result};
pub use lottery::{DrawValidation, Lottery, LotteryConfig, NumberRules};
pub use tickets::RawNumbers;
pub use types::{
    Caller, CloseOutcome, Draw, DrawStatus, OpenOutcome, Round, RoundSummary, Ticket, TicketView,
};

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_full_round_trip() {
        let temp_dir = tempdir().unwrap();
        let lottery = Lottery::new(temp_dir.path(), LotteryConfig::default())
            .await
            .unwrap();
        let admin = Caller::admin();

        let round = lottery.open_new_round(&admin).await.unwrap().round().clone();
        let ticket = lottery
            .submit_ticket("P1", "1,2,3,4,5,6", &Caller::identified("alice"))
            .await
            .unwrap();
        assert_eq!(ticket.numbers, vec![1, 2, 3, 4, 5, 6]);

        let err = lottery.publish_draw([1, 2, 3, 7, 8, 9], &admin).await.unwrap_err();
        assert!(matches!(err, LottoError::BettingStillActive));

        lottery.close_open_round(&admin).await.unwrap();
        let err = lottery
            .submit_ticket("P2", "1,2,3,4,5,6", &Caller::public())
            .await
            .unwrap_err();
        assert!(matches!(err, LottoError::AdmissionClosed));

        let draw = lottery.publish_draw([9, 3, 1, 40, 8, 2], &admin).await.unwrap();
        assert_eq!(draw.round_id, round.id);

        let view = lottery.get_ticket_view(&ticket.id.to_string()).await.unwrap();
        assert_eq!(
            view.draw,
            DrawStatus::Drawn {
                numbers: vec![9, 3, 1, 40, 8, 2],
                matched: vec![1, 2, 3],
            }
        );

        let summaries = lottery.list_rounds(&admin).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].ticket_count, 1);
        assert!(summaries[0].has_draw);
        assert!(!summaries[0].round.is_open);
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let temp_dir = tempdir().unwrap();
        let ticket_id = {
            let lottery = Lottery::new(temp_dir.path(), LotteryConfig::default())
                .await
                .unwrap();
            lottery.open_new_round(&Caller::admin()).await.unwrap();
            lottery
                .submit_ticket("P1", [10, 20, 30, 40, 41, 42], &Caller::public())
                .await
                .unwrap()
                .id
        };

        let lottery = Lottery::new(temp_dir.path(), LotteryConfig::default())
            .await
            .unwrap();
        assert!(lottery.get_open_round().await.unwrap().is_some());
        assert!(matches!(
            lottery.open_new_round(&Caller::admin()).await.unwrap(),
            OpenOutcome::AlreadyOpen(_)
        ));

        let view = lottery.get_ticket_view(&ticket_id.to_string()).await.unwrap();
        assert_eq!(view.draw, DrawStatus::NotYetDrawn);
    }

    #[tokio::test]
    async fn test_rejects_invalid_config() {
        let temp_dir = tempdir().unwrap();
        let mut config = LotteryConfig::default();
        config.ticket_rules.min_count = 0;

        assert!(matches!(
            Lottery::new(temp_dir.path(), config).await,
            Err(LottoError::Config(_))
        ));
    }
}
