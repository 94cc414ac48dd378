use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::error::{EngineError, EngineResult};
use crate::models::post::Post;
use crate::models::user::UserId;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub current: i64,
    pub best: i64,
}

/// Streak over the posting history alone, ignoring any previously stored
/// best.
///
/// A streak day is a calendar day (UTC) with at least one post. `current` is
/// the run of consecutive days ending on `today` or yesterday; one quiet day
/// keeps the run alive while today's post may still be coming, two or more
/// reset it to zero.
pub fn streak_from_posts(posts: &[Post], today: NaiveDate) -> Streak {
    let mut days: Vec<NaiveDate> = posts.iter().map(|p| p.created_at.date()).collect();
    days.sort_unstable();
    days.dedup();

    let Some(&last) = days.last() else {
        return Streak { current: 0, best: 0 };
    };

    let mut best = 1i64;
    let mut run = 1i64;
    for pair in days.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
            best = best.max(run);
        } else {
            run = 1;
        }
    }

    let current = if (today - last).num_days() <= 1 {
        // `run` ended the loop holding the length of the trailing run
        run
    } else {
        0
    };

    Streak { current, best }
}

/// Recomputes and persists a user's streak fields after a post mutation.
pub struct StreakTracker<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> StreakTracker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    #[instrument(skip(self), fields(user = %user_id))]
    pub async fn recompute_streak(&self, user_id: &UserId) -> EngineResult<Streak> {
        self.recompute_streak_as_of(user_id, Utc::now().date_naive())
            .await
    }

    /// Full recomputation from the posting history. Deletions can shrink both
    /// the history and `current`, but `best` never decreases: the stored value
    /// is folded back in.
    #[instrument(skip(self), fields(user = %user_id))]
    pub async fn recompute_streak_as_of(
        &self,
        user_id: &UserId,
        today: NaiveDate,
    ) -> EngineResult<Streak> {
        let user = self
            .store
            .user(user_id)
            .await?
            .ok_or_else(|| EngineError::user_not_found(user_id))?;

        let posts = self.store.posts_for_user(user_id).await?;
        let computed = streak_from_posts(&posts, today);
        let streak = Streak {
            current: computed.current,
            best: computed.best.max(user.best_streak),
        };

        self.store
            .update_user_streak(user_id, streak.current, streak.best)
            .await?;
        tracing::debug!(current = streak.current, best = streak.best, "recomputed streak");

        Ok(streak)
    }
}
