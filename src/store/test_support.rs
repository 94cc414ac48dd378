//! Test-data generators in the style used throughout the suite: one trait
//! per model with a `generate_*` constructor.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use uuid::Uuid;

use crate::models::post::Post;
use crate::models::team::{Team, TeamId};
use crate::models::user::{Role, User, UserId};

pub fn day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(12, 0, 0).unwrap()
}

pub trait TestUser {
    fn generate_test_user() -> User {
        let id = format!("{}", rand::random_range(100000000..=999999999u64));
        let display_name: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(7)
            .map(char::from)
            .collect();

        User {
            id: id.into(),
            display_name,
            role: Role::Regular,
            team_id: None,
            total_score: 0,
            current_streak: 0,
            best_streak: 0,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn generate_team_member(team_id: &TeamId) -> User;
}

impl TestUser for User {
    fn generate_team_member(team_id: &TeamId) -> User {
        let mut user = User::generate_test_user();
        user.team_id = Some(team_id.clone());
        user
    }
}

pub trait TestTeam {
    fn generate_test_team() -> Team {
        Team {
            id: Uuid::new_v4().to_string().into(),
            name: "growth".to_string(),
            team_lead_id: None,
        }
    }
}

impl TestTeam for Team {}

pub trait TestPost {
    fn generate_test_post(owner: &UserId, created_at: NaiveDateTime, total_score: i64) -> Post {
        Post {
            id: Uuid::new_v4().to_string().into(),
            owner_id: owner.clone(),
            reactions: rand::random_range(0..=50),
            comments: rand::random_range(0..=20),
            reposts: rand::random_range(0..=10),
            total_score,
            created_at,
        }
    }
}

impl TestPost for Post {}
