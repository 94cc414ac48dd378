use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::EngineResult;
use crate::models::achievement::{AchievementDefinition, AchievementId};
use crate::models::post::Post;
use crate::models::team::{Team, TeamId};
use crate::models::user::{User, UserId};

pub mod memory;
pub mod pg;

#[cfg(test)]
pub mod test_support;

/// Persistence capability consumed by the engine.
///
/// Two semantics are required of implementors beyond the obvious:
/// writes to a single user row are serialized by the store, and
/// [`Store::insert_grant`] is atomic insert-if-absent — a lost race reports
/// `false`, never an error.
#[async_trait]
pub trait Store: Send + Sync {
    async fn user(&self, id: &UserId) -> EngineResult<Option<User>>;

    async fn all_users(&self) -> EngineResult<Vec<User>>;

    async fn team(&self, id: &TeamId) -> EngineResult<Option<Team>>;

    async fn team_members(&self, team_id: &TeamId) -> EngineResult<Vec<User>>;

    /// All non-deleted posts owned by `owner`.
    async fn posts_for_user(&self, owner: &UserId) -> EngineResult<Vec<Post>>;

    /// Posts owned by any of `owners` created at or after `since`.
    async fn posts_for_users_since(
        &self,
        owners: &[UserId],
        since: NaiveDateTime,
    ) -> EngineResult<Vec<Post>>;

    async fn update_user_score(&self, id: &UserId, total: i64) -> EngineResult<()>;

    async fn update_user_streak(&self, id: &UserId, current: i64, best: i64) -> EngineResult<()>;

    async fn achievement_catalog(&self) -> EngineResult<Vec<AchievementDefinition>>;

    async fn granted_achievement_ids(&self, user: &UserId)
    -> EngineResult<HashSet<AchievementId>>;

    /// Returns `true` when the grant was created, `false` when it already
    /// existed (including a lost concurrent race).
    async fn insert_grant(
        &self,
        user: &UserId,
        achievement: &AchievementId,
        awarded_at: NaiveDateTime,
    ) -> EngineResult<bool>;
}
