use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use tracing::instrument;

use crate::error::{EngineError, EngineResult};
use crate::models::leaderboard::{LeaderboardEntry, Scope, Timeframe};
use crate::models::user::{User, UserId};
use crate::store::Store;

/// Read-only ranking view over current user/team state.
pub struct LeaderboardAssembler<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> LeaderboardAssembler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    #[instrument(skip(self, requesting_user), fields(user = %requesting_user.id))]
    pub async fn build(
        &self,
        scope: Scope,
        timeframe: Timeframe,
        requesting_user: &User,
    ) -> EngineResult<Vec<LeaderboardEntry>> {
        self.build_as_of(scope, timeframe, requesting_user, Utc::now().naive_utc())
            .await
    }

    /// Ranks the scoped population descending by score. Ties break on earlier
    /// account creation, then on user id, so the output is deterministic for
    /// a fixed snapshot.
    #[instrument(skip(self, requesting_user), fields(user = %requesting_user.id))]
    pub async fn build_as_of(
        &self,
        scope: Scope,
        timeframe: Timeframe,
        requesting_user: &User,
        now: NaiveDateTime,
    ) -> EngineResult<Vec<LeaderboardEntry>> {
        let population = match scope {
            Scope::Company => self.store.all_users().await?,
            Scope::Team => {
                let team_id = requesting_user.team_id.clone().ok_or_else(|| {
                    EngineError::NotApplicable(format!(
                        "user '{}' does not belong to a team",
                        requesting_user.id
                    ))
                })?;

                if self.store.team(&team_id).await?.is_none() {
                    return Err(EngineError::NotFound("team", team_id.to_string()));
                }

                self.store.team_members(&team_id).await?
            }
        };

        let mut scored: Vec<(User, i64)> = match timeframe.window_start(now) {
            None => population
                .into_iter()
                .map(|u| {
                    let score = u.total_score;
                    (u, score)
                })
                .collect(),
            Some(since) => {
                let ids: Vec<UserId> = population.iter().map(|u| u.id.clone()).collect();
                let posts = self.store.posts_for_users_since(&ids, since).await?;

                let mut windowed: HashMap<UserId, i64> = HashMap::new();
                for post in posts {
                    *windowed.entry(post.owner_id.clone()).or_default() += post.total_score;
                }

                population
                    .into_iter()
                    .map(|u| {
                        let score = windowed.get(&u.id).copied().unwrap_or(0);
                        (u, score)
                    })
                    .collect()
            }
        };

        scored.sort_by(|(a, a_score), (b, b_score)| {
            b_score
                .cmp(a_score)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.0.cmp(&b.id.0))
        });

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(i, (user, score))| LeaderboardEntry {
                user_id: user.id,
                display_name: user.display_name,
                score,
                ranking: i as i64 + 1,
            })
            .collect())
    }
}
