use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::user::UserId;

/// Population being ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Team,
    Company,
}

/// Trailing window of posts considered when computing a ranking score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    All,
    Month,
    Week,
}

impl Timeframe {
    /// Start of the rolling window ending at `now`, or `None` when the stored
    /// all-time score applies.
    pub fn window_start(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Timeframe::All => None,
            Timeframe::Month => Some(now - Duration::days(30)),
            Timeframe::Week => Some(now - Duration::days(7)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub display_name: String,
    pub score: i64,
    pub ranking: i64,
}
