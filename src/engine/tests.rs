//! Cross-component flows: post mutations driving the full
//! score/streak/achievement pipeline.

use chrono::{NaiveDate, NaiveDateTime};

use crate::engine::Engine;
use crate::models::achievement::{AchievementDefinition, RequirementType};
use crate::models::post::Post;
use crate::models::user::{User, UserId};
use crate::store::Store;
use crate::store::memory::MemoryStore;
use crate::store::test_support::{TestPost, TestUser, day};

fn jan(d: u32) -> NaiveDateTime {
    day(NaiveDate::from_ymd_opt(2026, 1, d).unwrap())
}

fn definition(id: &str, requirement_type: RequirementType, value: i64) -> AchievementDefinition {
    AchievementDefinition {
        id: id.into(),
        name: id.replace('_', " "),
        requirement_type,
        requirement_value: value,
        points: 25,
    }
}

async fn seeded_store() -> (MemoryStore, UserId) {
    let store = MemoryStore::new();
    let user = User::generate_test_user();
    let uid = user.id.clone();
    store.insert_user(user).await;
    (store, uid)
}

#[tokio::test]
async fn creation_flow_updates_all_derived_state() {
    let (store, uid) = seeded_store().await;
    store
        .insert_definition(definition("first_post", RequirementType::PostsCount, 1))
        .await;
    store
        .insert_definition(definition("three_day_streak", RequirementType::StreakDays, 3))
        .await;

    let engine = Engine::new(&store);

    store.create_post(Post::generate_test_post(&uid, jan(1), 10)).await;
    let outcome = engine.handle_post_mutation_as_of(&uid, jan(1)).await.unwrap();
    assert_eq!(outcome.total_score, 10);
    assert_eq!(outcome.streak.current, 1);
    assert_eq!(outcome.newly_granted, vec!["first_post".into()]);

    store.create_post(Post::generate_test_post(&uid, jan(2), 15)).await;
    store.create_post(Post::generate_test_post(&uid, jan(3), 5)).await;
    let outcome = engine.handle_post_mutation_as_of(&uid, jan(3)).await.unwrap();
    assert_eq!(outcome.total_score, 30);
    assert_eq!(outcome.streak.current, 3);
    assert_eq!(outcome.newly_granted, vec!["three_day_streak".into()]);

    let stored = store.stored_user(&uid).await.unwrap();
    assert_eq!(stored.total_score, 30);
    assert_eq!(stored.current_streak, 3);
    assert_eq!(stored.best_streak, 3);
}

#[tokio::test]
async fn deletion_flow_shrinks_score_and_streak() {
    let (store, uid) = seeded_store().await;
    let engine = Engine::new(&store);

    let posts: Vec<Post> = (1..=3)
        .map(|d| Post::generate_test_post(&uid, jan(d), 10))
        .collect();
    let doomed = posts[2].id.clone();
    for post in posts {
        store.create_post(post).await;
    }
    engine.handle_post_mutation_as_of(&uid, jan(3)).await.unwrap();

    assert!(store.delete_post(&doomed).await);
    let outcome = engine.handle_post_mutation_as_of(&uid, jan(3)).await.unwrap();

    assert_eq!(outcome.total_score, 20);
    assert_eq!(outcome.streak.current, 2);
    // best streak is a high-water mark
    assert_eq!(outcome.streak.best, 3);
}

#[tokio::test]
async fn stored_score_always_matches_post_sum() {
    let (store, uid) = seeded_store().await;
    let engine = Engine::new(&store);

    let mut kept_ids = Vec::new();
    for (d, score) in [(1, 5), (2, 11), (4, 20), (7, 3)] {
        let post = Post::generate_test_post(&uid, jan(d), score);
        kept_ids.push(post.id.clone());
        store.create_post(post).await;
        engine.handle_post_mutation_as_of(&uid, jan(d)).await.unwrap();
    }

    for doomed in [kept_ids.remove(1), kept_ids.remove(2)] {
        store.delete_post(&doomed).await;
        engine.handle_post_mutation_as_of(&uid, jan(8)).await.unwrap();

        let posts = store.posts_for_user(&uid).await.unwrap();
        let expected: i64 = posts.iter().map(|p| p.total_score).sum();
        assert_eq!(store.stored_user(&uid).await.unwrap().total_score, expected);
    }
}

#[tokio::test]
async fn mutation_flow_is_idempotent_without_changes() {
    let (store, uid) = seeded_store().await;
    store
        .insert_definition(definition("first_post", RequirementType::PostsCount, 1))
        .await;
    let engine = Engine::new(&store);

    store.create_post(Post::generate_test_post(&uid, jan(1), 10)).await;
    let first = engine.handle_post_mutation_as_of(&uid, jan(1)).await.unwrap();
    let second = engine.handle_post_mutation_as_of(&uid, jan(1)).await.unwrap();

    assert_eq!(first.total_score, second.total_score);
    assert_eq!(first.streak, second.streak);
    assert_eq!(first.newly_granted.len(), 1);
    assert!(second.newly_granted.is_empty());
}
