use core::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::engine::engagement::total_engagement;
use crate::models::user::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct PostId(pub String);

/// Base post table model
///
/// `total_score` arrives precomputed from the scoring pipeline; this crate
/// treats it as an opaque input and only ever sums it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    pub owner_id: UserId,
    pub reactions: i64,
    pub comments: i64,
    pub reposts: i64,
    pub total_score: i64,
    pub created_at: NaiveDateTime,
}

impl Post {
    pub fn total_engagement(&self) -> i64 {
        total_engagement(Some(self.reactions), Some(self.comments), Some(self.reposts))
    }
}

impl From<String> for PostId {
    fn from(value: String) -> Self {
        PostId(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        PostId(value.to_string())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
