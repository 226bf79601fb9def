use crate::error::{LottoError, Result};
use crate::lottery::config::{DrawValidation, NumberRules};
use crate::rounds::require_admin;
use crate::storage::{self, draw_store, round_store, DrawStore, Storage};
use crate::tickets::{RawNumbers, ValidatedDrawInput};
use crate::types::{Caller, Draw};
use std::sync::Arc;
use uuid::Uuid;

/// Records the winning numbers of the latest round once betting has closed
pub struct DrawPublication {
    storage: Arc<Storage>,
    policy: DrawValidation,
    rules: NumberRules,
}

impl DrawPublication {
    pub fn new(storage: Arc<Storage>, policy: DrawValidation, rules: NumberRules) -> Self {
        Self {
            storage,
            policy,
            rules,
        }
    }

    /// Preconditions, first failure wins: no open round, some round exists,
    /// that round has no draw yet, the numbers are well formed.
    pub async fn publish_draw(&self, numbers: &RawNumbers, caller: &Caller) -> Result<Draw> {
        require_admin(caller, "publish a draw")?;

        let result = self
            .storage
            .transaction(|tx| {
                if round_store::find_open(tx)?.is_some() {
                    return Err(LottoError::BettingStillActive);
                }

                let round = round_store::find_latest(tx)?.ok_or(LottoError::NoRoundsExist)?;

                if draw_store::find_for_round(tx, round.id)?.is_some() {
                    return Err(LottoError::DrawAlreadyExists { round_id: round.id });
                }

                let input = ValidatedDrawInput::parse(numbers, self.policy, &self.rules)?;

                let draw = Draw {
                    id: Uuid::new_v4(),
                    numbers: input.into_numbers(),
                    created_at: storage::now(),
                    round_id: round.id,
                };

                draw_store::insert(tx, &draw)?;
                Ok(draw)
            })
            .await;

        match &result {
            Ok(draw) => tracing::info!(
                "Published draw {} for round {}: {:?}",
                draw.id,
                draw.round_id,
                draw.numbers
            ),
            Err(e) if e.is_validation() => tracing::warn!("Rejected draw: {}", e),
            Err(e) => tracing::error!("Draw publication failed: {}", e),
        }

        result
    }

    pub async fn get_draw(&self, round_id: i64) -> Result<Option<Draw>> {
        DrawStore::new(&self.storage).load_for_round(round_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rounds::RoundManager;
    use serde_json::json;
    use tempfile::tempdir;

    async fn setup(policy: DrawValidation) -> (tempfile::TempDir, RoundManager, Arc<DrawPublication>) {
        let dir = tempdir().unwrap();
        let storage = Arc::new(Storage::new(&dir.path().join("lotto.db")).await.unwrap());
        let rounds = RoundManager::new(storage.clone());
        let draws = Arc::new(DrawPublication::new(storage, policy, NumberRules::default()));
        (dir, rounds, draws)
    }

    #[tokio::test]
    async fn test_precondition_order() {
        let (_dir, rounds, draws) = setup(DrawValidation::ShapeOnly).await;
        let admin = Caller::admin();

        // Nothing exists yet
        let err = draws.publish_draw(&json!(null).into(), &admin).await.unwrap_err();
        assert!(matches!(err, LottoError::NoRoundsExist));

        // Open round beats malformed numbers
        rounds.open_new_round(&admin).await.unwrap();
        let err = draws.publish_draw(&json!(null).into(), &admin).await.unwrap_err();
        assert!(matches!(err, LottoError::BettingStillActive));

        rounds.close_open_round(&admin).await.unwrap();
        let err = draws.publish_draw(&json!({"n": 1}).into(), &admin).await.unwrap_err();
        assert!(matches!(err, LottoError::MissingOrInvalidNumbers(_)));
    }

    #[tokio::test]
    async fn test_publish_once_per_round() {
        let (_dir, rounds, draws) = setup(DrawValidation::ShapeOnly).await;
        let admin = Caller::admin();

        let round = rounds.open_new_round(&admin).await.unwrap().round().clone();
        rounds.close_open_round(&admin).await.unwrap();

        let draw = draws
            .publish_draw(&RawNumbers::from([3, 14, 15, 92, 65]), &admin)
            .await
            .unwrap();
        assert_eq!(draw.round_id, round.id);
        assert_eq!(draw.numbers, vec![3, 14, 15, 92, 65]);
        assert_eq!(draws.get_draw(round.id).await.unwrap(), Some(draw));

        let err = draws
            .publish_draw(&RawNumbers::from([1, 2, 3, 4, 5, 6]), &admin)
            .await
            .unwrap_err();
        assert!(matches!(err, LottoError::DrawAlreadyExists { round_id } if round_id == round.id));

        // A later round gets its own draw
        let next = rounds.open_new_round(&admin).await.unwrap().round().clone();
        rounds.close_open_round(&admin).await.unwrap();
        let second = draws
            .publish_draw(&RawNumbers::from("1 2 3 4 5 6"), &admin)
            .await
            .unwrap();
        assert_eq!(second.round_id, next.id);
    }

    #[tokio::test]
    async fn test_ticket_rules_policy() {
        let (_dir, rounds, draws) = setup(DrawValidation::TicketRules).await;
        let admin = Caller::admin();

        rounds.open_new_round(&admin).await.unwrap();
        rounds.close_open_round(&admin).await.unwrap();

        let err = draws
            .publish_draw(&RawNumbers::from([1, 2, 3, 4, 5, 99]), &admin)
            .await
            .unwrap_err();
        assert!(matches!(err, LottoError::InvalidRange(_)));

        assert!(draws
            .publish_draw(&RawNumbers::from([1, 2, 3, 4, 5, 45]), &admin)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_publish_requires_admin() {
        let (_dir, rounds, draws) = setup(DrawValidation::ShapeOnly).await;
        rounds.open_new_round(&Caller::admin()).await.unwrap();
        rounds.close_open_round(&Caller::admin()).await.unwrap();

        let err = draws
            .publish_draw(&RawNumbers::from([1, 2, 3, 4, 5, 6]), &Caller::identified("mallory"))
            .await
            .unwrap_err();
        assert!(matches!(err, LottoError::Unauthorized(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_publish_records_one_draw() {
        let (_dir, rounds, draws) = setup(DrawValidation::ShapeOnly).await;
        let admin = Caller::admin();
        rounds.open_new_round(&admin).await.unwrap();
        rounds.close_open_round(&admin).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8i64 {
            let draws = draws.clone();
            handles.push(tokio::spawn(async move {
                draws
                    .publish_draw(&RawNumbers::from(vec![i, i + 1]), &Caller::admin())
                    .await
            }));
        }

        let mut published = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => published += 1,
                Err(LottoError::DrawAlreadyExists { .. }) => {}
                Err(e) => panic!("unexpected error {:?}", e),
            }
        }
        assert_eq!(published, 1);
    }
}
