use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::RwLock;

use crate::error::{EngineError, EngineResult};
use crate::models::achievement::{AchievementDefinition, AchievementId, UserAchievement};
use crate::models::post::{Post, PostId};
use crate::models::team::{Team, TeamId};
use crate::models::user::{User, UserId};
use crate::store::Store;

/// In-process [`Store`] used by the test suite.
///
/// Post create/delete are the mutations the engine is driven with in tests;
/// `fail_reads_for` injects a transient store failure for a single user so
/// batch semantics can be exercised.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<UserId, User>,
    teams: HashMap<TeamId, Team>,
    posts: HashMap<PostId, Post>,
    catalog: Vec<AchievementDefinition>,
    grants: Vec<UserAchievement>,
    failing_users: HashSet<UserId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id.clone(), user);
    }

    pub async fn insert_team(&self, team: Team) {
        self.inner.write().await.teams.insert(team.id.clone(), team);
    }

    pub async fn insert_definition(&self, def: AchievementDefinition) {
        self.inner.write().await.catalog.push(def);
    }

    pub async fn create_post(&self, post: Post) {
        self.inner.write().await.posts.insert(post.id.clone(), post);
    }

    pub async fn delete_post(&self, id: &PostId) -> bool {
        self.inner.write().await.posts.remove(id).is_some()
    }

    /// Every subsequent post read for `user` fails until cleared.
    pub async fn fail_reads_for(&self, user: &UserId) {
        self.inner.write().await.failing_users.insert(user.clone());
    }

    pub async fn clear_failures(&self) {
        self.inner.write().await.failing_users.clear();
    }

    pub async fn stored_user(&self, id: &UserId) -> Option<User> {
        self.inner.read().await.users.get(id).cloned()
    }

    pub async fn grant_count(&self) -> usize {
        self.inner.read().await.grants.len()
    }

    fn transient_failure() -> EngineError {
        EngineError::Store(sqlx::Error::Protocol("injected read failure".into()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn user(&self, id: &UserId) -> EngineResult<Option<User>> {
        Ok(self.inner.read().await.users.get(id).cloned())
    }

    async fn all_users(&self) -> EngineResult<Vec<User>> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }

    async fn team(&self, id: &TeamId) -> EngineResult<Option<Team>> {
        Ok(self.inner.read().await.teams.get(id).cloned())
    }

    async fn team_members(&self, team_id: &TeamId) -> EngineResult<Vec<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .filter(|u| u.team_id.as_ref() == Some(team_id))
            .cloned()
            .collect())
    }

    async fn posts_for_user(&self, owner: &UserId) -> EngineResult<Vec<Post>> {
        let inner = self.inner.read().await;
        if inner.failing_users.contains(owner) {
            return Err(Self::transient_failure());
        }

        Ok(inner
            .posts
            .values()
            .filter(|p| &p.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn posts_for_users_since(
        &self,
        owners: &[UserId],
        since: NaiveDateTime,
    ) -> EngineResult<Vec<Post>> {
        let inner = self.inner.read().await;
        if owners.iter().any(|o| inner.failing_users.contains(o)) {
            return Err(Self::transient_failure());
        }

        Ok(inner
            .posts
            .values()
            .filter(|p| owners.contains(&p.owner_id) && p.created_at >= since)
            .cloned()
            .collect())
    }

    async fn update_user_score(&self, id: &UserId, total: i64) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(id)
            .ok_or_else(|| EngineError::user_not_found(id))?;
        user.total_score = total;

        Ok(())
    }

    async fn update_user_streak(&self, id: &UserId, current: i64, best: i64) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(id)
            .ok_or_else(|| EngineError::user_not_found(id))?;
        user.current_streak = current;
        user.best_streak = best;

        Ok(())
    }

    async fn achievement_catalog(&self) -> EngineResult<Vec<AchievementDefinition>> {
        Ok(self.inner.read().await.catalog.clone())
    }

    async fn granted_achievement_ids(
        &self,
        user: &UserId,
    ) -> EngineResult<HashSet<AchievementId>> {
        Ok(self
            .inner
            .read()
            .await
            .grants
            .iter()
            .filter(|g| &g.user_id == user)
            .map(|g| g.achievement_id.clone())
            .collect())
    }

    async fn insert_grant(
        &self,
        user: &UserId,
        achievement: &AchievementId,
        awarded_at: NaiveDateTime,
    ) -> EngineResult<bool> {
        let mut inner = self.inner.write().await;
        let exists = inner
            .grants
            .iter()
            .any(|g| &g.user_id == user && &g.achievement_id == achievement);
        if exists {
            return Ok(false);
        }

        inner.grants.push(UserAchievement {
            user_id: user.clone(),
            achievement_id: achievement.clone(),
            awarded_at,
        });

        Ok(true)
    }
}
