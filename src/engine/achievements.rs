use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::engine::engagement::engagement_for_posts;
use crate::engine::streak::streak_from_posts;
use crate::error::{EngineError, EngineResult};
use crate::models::achievement::{AchievementDefinition, AchievementId, RequirementType};
use crate::models::post::Post;
use crate::models::user::UserId;
use crate::store::Store;

/// Upper bound on user ids accepted by a single batch evaluation.
pub const MAX_BATCH_USERS: usize = 50;

/// Snapshot of the metrics achievement requirements are checked against.
#[derive(Debug, Clone, Copy)]
struct UserMetrics {
    posts_count: i64,
    engagement_total: i64,
    current_streak: i64,
    max_single_post_reactions: i64,
}

impl UserMetrics {
    fn from_posts(posts: &[Post], current_streak: i64) -> Self {
        Self {
            posts_count: posts.len() as i64,
            engagement_total: engagement_for_posts(posts),
            current_streak,
            max_single_post_reactions: posts.iter().map(|p| p.reactions.max(0)).max().unwrap_or(0),
        }
    }

    fn satisfies(&self, def: &AchievementDefinition) -> bool {
        let observed = match def.requirement_type {
            RequirementType::PostsCount => self.posts_count,
            RequirementType::EngagementTotal => self.engagement_total,
            RequirementType::StreakDays => self.current_streak,
            RequirementType::SinglePostReactions => self.max_single_post_reactions,
        };

        observed >= def.requirement_value
    }
}

/// Per-user outcome inside a batch evaluation report.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub user_id: UserId,
    pub outcome: BatchOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum BatchOutcome {
    Granted(Vec<AchievementId>),
    Failed(String),
}

/// Evaluates the achievement catalog against a user's current metrics and
/// grants every newly satisfied definition exactly once.
pub struct AchievementEvaluator<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> AchievementEvaluator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    #[instrument(skip(self), fields(user = %user_id))]
    pub async fn check_and_award(&self, user_id: &UserId) -> EngineResult<Vec<AchievementId>> {
        self.check_and_award_as_of(user_id, Utc::now().naive_utc())
            .await
    }

    /// Returns the ids granted by this call; already-granted definitions are
    /// skipped, so an immediate re-run returns an empty set. Losing the
    /// insert race to a concurrent evaluation is treated the same way.
    #[instrument(skip(self), fields(user = %user_id))]
    pub async fn check_and_award_as_of(
        &self,
        user_id: &UserId,
        now: NaiveDateTime,
    ) -> EngineResult<Vec<AchievementId>> {
        if self.store.user(user_id).await?.is_none() {
            return Err(EngineError::user_not_found(user_id));
        }

        let posts = self.store.posts_for_user(user_id).await?;
        let streak = streak_from_posts(&posts, now.date());
        let metrics = UserMetrics::from_posts(&posts, streak.current);

        let catalog = self.store.achievement_catalog().await?;
        let granted = self.store.granted_achievement_ids(user_id).await?;

        let mut newly_granted = Vec::new();
        for def in catalog.iter().filter(|d| !granted.contains(&d.id)) {
            if !metrics.satisfies(def) {
                continue;
            }

            if self.store.insert_grant(user_id, &def.id, now).await? {
                tracing::info!(achievement = %def.id, points = def.points, "achievement granted");
                newly_granted.push(def.id.clone());
            }
        }

        Ok(newly_granted)
    }

    /// Evaluates up to [`MAX_BATCH_USERS`] users independently. One user's
    /// failure is recorded in their entry and never aborts the rest.
    #[instrument(skip(self, user_ids), fields(user_count = user_ids.len()))]
    pub async fn check_and_award_batch(
        &self,
        user_ids: &[UserId],
    ) -> EngineResult<Vec<BatchEntry>> {
        self.check_and_award_batch_as_of(user_ids, Utc::now().naive_utc())
            .await
    }

    pub async fn check_and_award_batch_as_of(
        &self,
        user_ids: &[UserId],
        now: NaiveDateTime,
    ) -> EngineResult<Vec<BatchEntry>> {
        if user_ids.len() > MAX_BATCH_USERS {
            return Err(EngineError::Validation(format!(
                "batch accepts at most {MAX_BATCH_USERS} user ids, got {}",
                user_ids.len()
            )));
        }

        let mut entries = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            let outcome = match self.check_and_award_as_of(user_id, now).await {
                Ok(granted) => BatchOutcome::Granted(granted),
                Err(e) => {
                    tracing::error!(user = %user_id, error = ?e, "batch evaluation failed for user");
                    BatchOutcome::Failed(e.to_string())
                }
            };

            entries.push(BatchEntry {
                user_id: user_id.clone(),
                outcome,
            });
        }

        Ok(entries)
    }
}
