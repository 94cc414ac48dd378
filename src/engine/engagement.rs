use crate::models::post::Post;

/// Total engagement for one post's raw counters.
///
/// Total and pure: missing or negative counters count as zero, so this never
/// fails regardless of what the upstream analytics feed produced.
pub fn total_engagement(reactions: Option<i64>, comments: Option<i64>, reposts: Option<i64>) -> i64 {
    [reactions, comments, reposts]
        .into_iter()
        .map(|count| count.unwrap_or(0).max(0))
        .sum()
}

/// Engagement summed across a user's posts.
pub fn engagement_for_posts(posts: &[Post]) -> i64 {
    posts.iter().map(Post::total_engagement).sum()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::test_support::{TestPost, day};
    use chrono::NaiveDate;

    #[test]
    fn sums_non_negative_counters() {
        assert_eq!(total_engagement(Some(3), Some(2), Some(1)), 6);
        assert_eq!(total_engagement(Some(0), Some(0), Some(0)), 0);
    }

    #[test]
    fn missing_counters_count_as_zero() {
        assert_eq!(total_engagement(None, Some(4), None), 4);
        assert_eq!(total_engagement(None, None, None), 0);
    }

    #[test]
    fn negative_counters_count_as_zero() {
        assert_eq!(total_engagement(Some(-5), Some(2), Some(-1)), 2);
    }

    #[test]
    fn sums_across_posts() {
        let owner = "u1".into();
        let created = day(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());

        let mut a = crate::models::post::Post::generate_test_post(&owner, created, 0);
        a.reactions = 2;
        a.comments = 1;
        a.reposts = 0;
        let mut b = crate::models::post::Post::generate_test_post(&owner, created, 0);
        b.reactions = 5;
        b.comments = 0;
        b.reposts = 3;

        assert_eq!(engagement_for_posts(&[a, b]), 11);
    }
}
