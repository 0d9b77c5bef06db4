// src/engine/rank.rs

use std::collections::{BTreeMap, HashMap};

use crate::models::{analytics::RankEntry, result_record::ResultRecord};

/// Name shown for users the identity provider never told us about.
pub const ANONYMOUS: &str = "Anonymous";

/// Orders every user by cumulative score, highest first.
///
/// Equal totals fall back to ascending user id, so the order never depends on
/// the order records were fetched in.
pub fn standings<'a, I>(results: I, display_names: &HashMap<String, String>) -> Vec<RankEntry>
where
    I: IntoIterator<Item = &'a ResultRecord>,
{
    let mut totals: BTreeMap<&str, (i64, usize)> = BTreeMap::new();
    for result in results {
        let entry = totals.entry(result.user_id.as_str()).or_default();
        entry.0 += result.score;
        entry.1 += 1;
    }

    let mut ranked: Vec<(&str, i64, usize)> = totals
        .into_iter()
        .map(|(user, (score, tests))| (user, score, tests))
        .collect();

    // BTreeMap iteration already yields ascending ids; a stable sort keeps them for ties.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, (user_id, total_score, total_tests))| RankEntry {
            rank: i + 1,
            user_id: user_id.to_string(),
            display_name: display_names
                .get(user_id)
                .cloned()
                .unwrap_or_else(|| ANONYMOUS.to_string()),
            total_score,
            total_tests,
        })
        .collect()
}

/// Position of `user_id` among all users, or `None` when they have no records.
pub fn rank<'a, I>(
    results: I,
    display_names: &HashMap<String, String>,
    user_id: &str,
) -> Option<RankEntry>
where
    I: IntoIterator<Item = &'a ResultRecord>,
{
    standings(results, display_names)
        .into_iter()
        .find(|entry| entry.user_id == user_id)
}

/// The top `limit` entries of the standings.
pub fn leaderboard<'a, I>(
    results: I,
    display_names: &HashMap<String, String>,
    limit: usize,
) -> Vec<RankEntry>
where
    I: IntoIterator<Item = &'a ResultRecord>,
{
    let mut entries = standings(results, display_names);
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;

    fn result(user: &str, score: i64) -> ResultRecord {
        ResultRecord {
            user_id: user.to_string(),
            test_name: "t".to_string(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            total_questions: 50,
            attempted_questions: 0,
            correct_answers: 0,
            incorrect_answers: 0,
            score,
            accuracy: 0.0,
            time_taken_secs: 0,
            subject_analysis: Default::default(),
            questions: vec![],
            warnings: vec![],
        }
    }

    fn names() -> HashMap<String, String> {
        HashMap::from([("alice".to_string(), "Alice".to_string())])
    }

    #[test]
    fn ranks_by_cumulative_score() {
        let results = vec![
            result("bob", 20),
            result("alice", 12),
            result("carol", 30),
            result("alice", 15),
        ];

        let alice = rank(&results, &names(), "alice").unwrap();
        assert_eq!(alice.rank, 2);
        assert_eq!(alice.total_score, 27);
        assert_eq!(alice.total_tests, 2);
        assert_eq!(alice.display_name, "Alice");

        let carol = rank(&results, &names(), "carol").unwrap();
        assert_eq!(carol.rank, 1);
        assert_eq!(carol.display_name, ANONYMOUS);

        assert_eq!(rank(&results, &names(), "bob").unwrap().rank, 3);
    }

    #[test]
    fn users_without_records_have_no_rank() {
        let results = vec![result("bob", 4)];
        assert_eq!(rank(&results, &names(), "alice"), None);
        let empty: Vec<ResultRecord> = Vec::new();
        assert_eq!(rank(&empty, &names(), "alice"), None);
    }

    #[test]
    fn ties_resolve_by_user_id() {
        let results = vec![result("zed", 10), result("amy", 10), result("kim", 10)];
        let order: Vec<String> = standings(&results, &HashMap::new())
            .into_iter()
            .map(|e| e.user_id)
            .collect();
        assert_eq!(order, vec!["amy", "kim", "zed"]);

        let reversed: Vec<ResultRecord> = results.into_iter().rev().collect();
        assert_eq!(rank(&reversed, &HashMap::new(), "kim").unwrap().rank, 2);
    }

    #[test]
    fn negative_totals_rank_below_zero() {
        let results = vec![result("a", -3), result("b", 0), result("c", -1)];
        let order: Vec<String> = standings(&results, &HashMap::new())
            .into_iter()
            .map(|e| e.user_id)
            .collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn leaderboard_truncates() {
        let results = vec![result("a", 1), result("b", 2), result("c", 3)];
        let top = leaderboard(&results, &HashMap::new(), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].user_id, "c");
        assert_eq!(top[1].user_id, "b");
    }
}
