use core::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::post::Post;
use crate::models::team::TeamId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct UserId(pub String);

/// Role hierarchy, ordered lowest to highest so authorization checks can
/// compare variants directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Regular,
    TeamLead,
    Admin,
}

/// Base user table model
///
/// `total_score`, `current_streak` and `best_streak` are derived fields owned
/// by the engine; nothing else writes them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub role: Role,
    pub team_id: Option<TeamId>,
    pub total_score: i64,
    pub current_streak: i64,
    pub best_streak: i64,
    pub created_at: NaiveDateTime,
}

impl User {
    /// Posts are removable by their owner or by an admin, nobody else.
    pub fn can_delete(&self, post: &Post) -> bool {
        self.role >= Role::Admin || post.owner_id == self.id
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        UserId(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        UserId(value.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::post::PostId;
    use chrono::Utc;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.into(),
            display_name: id.to_string(),
            role,
            team_id: None,
            total_score: 0,
            current_streak: 0,
            best_streak: 0,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn post_owned_by(owner: &str) -> Post {
        Post {
            id: PostId("p1".into()),
            owner_id: owner.into(),
            reactions: 0,
            comments: 0,
            reposts: 0,
            total_score: 0,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn role_order_is_total() {
        assert!(Role::Regular < Role::TeamLead);
        assert!(Role::TeamLead < Role::Admin);
    }

    #[test]
    fn owner_and_admin_can_delete() {
        let post = post_owned_by("alice");

        assert!(user("alice", Role::Regular).can_delete(&post));
        assert!(user("root", Role::Admin).can_delete(&post));
        assert!(!user("bob", Role::Regular).can_delete(&post));
        assert!(!user("lead", Role::TeamLead).can_delete(&post));
    }
}
