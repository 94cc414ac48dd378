use tracing::instrument;

use crate::error::EngineResult;
use crate::models::user::UserId;
use crate::store::Store;

/// Recomputes a user's total score from their posts after every post
/// mutation.
pub struct ScoreAggregator<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> ScoreAggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Sum of the user's non-deleted posts' `total_score`, written back and
    /// returned. Idempotent; a failed read aborts before anything is written,
    /// so prior values survive transient store failures.
    #[instrument(skip(self), fields(user = %user_id))]
    pub async fn recompute_total_score(&self, user_id: &UserId) -> EngineResult<i64> {
        let posts = self.store.posts_for_user(user_id).await?;
        let total: i64 = posts.iter().map(|p| p.total_score).sum();

        self.store.update_user_score(user_id, total).await?;
        tracing::debug!(total, post_count = posts.len(), "recomputed total score");

        Ok(total)
    }
}
