use core::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::user::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct AchievementId(pub String);

/// Metric an achievement definition is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "requirement_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequirementType {
    PostsCount,
    EngagementTotal,
    StreakDays,
    SinglePostReactions,
}

/// Immutable catalog entry, created at setup time and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AchievementDefinition {
    pub id: AchievementId,
    pub name: String,
    pub requirement_type: RequirementType,
    pub requirement_value: i64,
    pub points: i64,
}

/// Grant record: permanent, at most one per (user, achievement) pair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserAchievement {
    pub user_id: UserId,
    pub achievement_id: AchievementId,
    pub awarded_at: NaiveDateTime,
}

impl From<String> for AchievementId {
    fn from(value: String) -> Self {
        AchievementId(value)
    }
}

impl From<&str> for AchievementId {
    fn from(value: &str) -> Self {
        AchievementId(value.to_string())
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
