use core::fmt;

use serde::{Deserialize, Serialize};

use crate::models::user::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct TeamId(pub String);

/// Soft association only: members point at the team via `User::team_id`, so
/// removing a team never removes its users.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub team_lead_id: Option<UserId>,
}

impl From<String> for TeamId {
    fn from(value: String) -> Self {
        TeamId(value)
    }
}

impl From<&str> for TeamId {
    fn from(value: &str) -> Self {
        TeamId(value.to_string())
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
