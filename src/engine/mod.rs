use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::engine::achievements::AchievementEvaluator;
use crate::engine::score::ScoreAggregator;
use crate::engine::streak::{Streak, StreakTracker};
use crate::error::EngineResult;
use crate::models::achievement::AchievementId;
use crate::models::user::UserId;
use crate::store::Store;

pub mod achievements;
pub mod engagement;
pub mod leaderboard;
pub mod score;
pub mod streak;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Serialize)]
pub struct MutationOutcome {
    pub total_score: i64,
    pub streak: Streak,
    pub newly_granted: Vec<AchievementId>,
}

/// Entry point tying the recomputation passes together.
pub struct Engine<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> Engine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Runs after every post creation or deletion for the post's owner:
    /// score aggregation, streak recomputation, then achievement evaluation
    /// over the refreshed metrics.
    #[instrument(skip(self), fields(user = %user_id))]
    pub async fn handle_post_mutation(&self, user_id: &UserId) -> EngineResult<MutationOutcome> {
        self.handle_post_mutation_as_of(user_id, Utc::now().naive_utc())
            .await
    }

    #[instrument(skip(self), fields(user = %user_id))]
    pub async fn handle_post_mutation_as_of(
        &self,
        user_id: &UserId,
        now: NaiveDateTime,
    ) -> EngineResult<MutationOutcome> {
        let total_score = ScoreAggregator::new(self.store)
            .recompute_total_score(user_id)
            .await?;
        let streak = StreakTracker::new(self.store)
            .recompute_streak_as_of(user_id, now.date())
            .await?;
        let newly_granted = AchievementEvaluator::new(self.store)
            .check_and_award_as_of(user_id, now)
            .await?;

        Ok(MutationOutcome {
            total_score,
            streak,
            newly_granted,
        })
    }
}
