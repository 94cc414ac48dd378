use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use tracing::instrument;

use crate::error::{EngineError, EngineResult};
use crate::models::achievement::{AchievementDefinition, AchievementId};
use crate::models::post::Post;
use crate::models::team::{Team, TeamId};
use crate::models::user::{User, UserId};
use crate::store::Store;

mod sql_fragment {
    pub const USER_FIELDS: &str = r#"
        id,
        display_name,
        role,
        team_id,
        total_score,
        current_streak,
        best_streak,
        created_at
    "#;

    pub const POST_FIELDS: &str = r#"
        id,
        owner_id,
        reactions,
        comments,
        reposts,
        total_score,
        created_at
    "#;

    pub const ACHIEVEMENT_FIELDS: &str = r#"
        id,
        name,
        requirement_type,
        requirement_value,
        points
    "#;
}

/// Postgres-backed [`Store`]. Row-level write serialization and the
/// (user_id, achievement_id) uniqueness the engine relies on both live in the
/// schema (`migrations/0001_init.sql`).
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str) -> EngineResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    #[instrument(skip(self))]
    async fn user(&self, id: &UserId) -> EngineResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM app_user WHERE id = $1",
            sql_fragment::USER_FIELDS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    #[instrument(skip(self))]
    async fn all_users(&self) -> EngineResult<Vec<User>> {
        Ok(sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM app_user ORDER BY created_at ASC, id ASC",
            sql_fragment::USER_FIELDS
        ))
        .fetch_all(&self.pool)
        .await?)
    }

    #[instrument(skip(self))]
    async fn team(&self, id: &TeamId) -> EngineResult<Option<Team>> {
        Ok(
            sqlx::query_as::<_, Team>("SELECT id, name, team_lead_id FROM team WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    #[instrument(skip(self))]
    async fn team_members(&self, team_id: &TeamId) -> EngineResult<Vec<User>> {
        Ok(sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM app_user WHERE team_id = $1 ORDER BY created_at ASC, id ASC",
            sql_fragment::USER_FIELDS
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?)
    }

    #[instrument(skip(self))]
    async fn posts_for_user(&self, owner: &UserId) -> EngineResult<Vec<Post>> {
        Ok(sqlx::query_as::<_, Post>(&format!(
            "SELECT {} FROM post WHERE owner_id = $1 ORDER BY created_at ASC",
            sql_fragment::POST_FIELDS
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?)
    }

    #[instrument(skip(self, owners), fields(owner_count = owners.len()))]
    async fn posts_for_users_since(
        &self,
        owners: &[UserId],
        since: NaiveDateTime,
    ) -> EngineResult<Vec<Post>> {
        let ids: Vec<String> = owners.iter().map(|id| id.0.clone()).collect();

        Ok(sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {}
            FROM post
            WHERE owner_id = ANY($1)
            AND created_at >= $2
            ORDER BY created_at ASC
            "#,
            sql_fragment::POST_FIELDS
        ))
        .bind(&ids)
        .bind(since)
        .fetch_all(&self.pool)
        .await?)
    }

    #[instrument(skip(self))]
    async fn update_user_score(&self, id: &UserId, total: i64) -> EngineResult<()> {
        let res = sqlx::query("UPDATE app_user SET total_score = $2 WHERE id = $1")
            .bind(id)
            .bind(total)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            return Err(EngineError::user_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_user_streak(&self, id: &UserId, current: i64, best: i64) -> EngineResult<()> {
        let res =
            sqlx::query("UPDATE app_user SET current_streak = $2, best_streak = $3 WHERE id = $1")
                .bind(id)
                .bind(current)
                .bind(best)
                .execute(&self.pool)
                .await?;

        if res.rows_affected() == 0 {
            return Err(EngineError::user_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn achievement_catalog(&self) -> EngineResult<Vec<AchievementDefinition>> {
        Ok(sqlx::query_as::<_, AchievementDefinition>(&format!(
            "SELECT {} FROM achievement ORDER BY id ASC",
            sql_fragment::ACHIEVEMENT_FIELDS
        ))
        .fetch_all(&self.pool)
        .await?)
    }

    #[instrument(skip(self))]
    async fn granted_achievement_ids(
        &self,
        user: &UserId,
    ) -> EngineResult<HashSet<AchievementId>> {
        let ids = sqlx::query_scalar::<_, AchievementId>(
            "SELECT achievement_id FROM user_achievement WHERE user_id = $1",
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }

    #[instrument(skip(self))]
    async fn insert_grant(
        &self,
        user: &UserId,
        achievement: &AchievementId,
        awarded_at: NaiveDateTime,
    ) -> EngineResult<bool> {
        // losing the unique-constraint race is an ordinary "already granted"
        let res = sqlx::query(
            r#"
            INSERT INTO user_achievement (user_id, achievement_id, awarded_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, achievement_id)
            DO NOTHING
            "#,
        )
        .bind(user)
        .bind(achievement)
        .bind(awarded_at)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }
}
