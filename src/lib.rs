//! Gamification core for PostWars: score aggregation, posting streaks,
//! achievement grants and leaderboard assembly, all running against a
//! pluggable [`store::Store`].

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;

pub mod prelude {
    pub use crate::error::{EngineError, EngineResult};

    pub use crate::models::achievement::{
        AchievementDefinition, AchievementId, RequirementType, UserAchievement,
    };
    pub use crate::models::leaderboard::{LeaderboardEntry, Scope, Timeframe};
    pub use crate::models::post::{Post, PostId};
    pub use crate::models::team::{Team, TeamId};
    pub use crate::models::user::{Role, User, UserId};

    pub use crate::engine::achievements::{
        AchievementEvaluator, BatchEntry, BatchOutcome, MAX_BATCH_USERS,
    };
    pub use crate::engine::leaderboard::LeaderboardAssembler;
    pub use crate::engine::score::ScoreAggregator;
    pub use crate::engine::streak::{Streak, StreakTracker};
    pub use crate::engine::{Engine, MutationOutcome};

    pub use crate::store::Store;
    pub use crate::store::memory::MemoryStore;
    pub use crate::store::pg::PgStore;
}
