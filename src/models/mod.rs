pub mod achievement;
pub mod leaderboard;
pub mod post;
pub mod team;
pub mod user;
