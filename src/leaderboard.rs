use crate::config::LEADERBOARD_CAP;
use chrono::Utc;
use log::info;
use serde::Serialize;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("bad score")]
    InvalidScore,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub score: u64,
    /// Submission time, unix milliseconds.
    pub ts: i64,
}

/// Process-wide ranked view of submitted scores. Volatile on purpose: state
/// lives in memory only and is lost on restart. No identity deduplication,
/// every submission is a new entry.
///
/// The append-sort-truncate sequence runs under one mutex so concurrent
/// submissions cannot interleave and the store never exceeds its cap.
#[derive(Debug, Default)]
pub struct Leaderboard {
    entries: Mutex<Vec<LeaderboardEntry>>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new entry, re-sorts descending by score and truncates to
    /// the cap. Ties order by submission time ascending, earlier first.
    /// An empty or missing username becomes "anonymous".
    pub fn submit(
        &self,
        username: &str,
        address: Option<String>,
        score: f64,
    ) -> Result<(), SubmitError> {
        if !score.is_finite() || score < 0.0 {
            return Err(SubmitError::InvalidScore);
        }
        let username = if username.is_empty() { "anonymous" } else { username };
        let entry = LeaderboardEntry {
            username: username.to_string(),
            address,
            score: score as u64,
            ts: Utc::now().timestamp_millis(),
        };
        info!("Leaderboard submission: {} -> {}", entry.username, entry.score);

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(entry);
        entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.ts.cmp(&b.ts)));
        entries.truncate(LEADERBOARD_CAP);
        Ok(())
    }

    /// Up to `n` highest-score entries, best first. No side effects.
    pub fn top(&self, n: usize) -> Vec<LeaderboardEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_score_is_rejected_without_mutation() {
        let board = Leaderboard::new();
        assert_eq!(
            board.submit("mallory", None, -1.0),
            Err(SubmitError::InvalidScore)
        );
        assert!(board.is_empty());
    }

    #[test]
    fn non_finite_score_is_rejected() {
        let board = Leaderboard::new();
        assert_eq!(
            board.submit("mallory", None, f64::NAN),
            Err(SubmitError::InvalidScore)
        );
        assert_eq!(
            board.submit("mallory", None, f64::INFINITY),
            Err(SubmitError::InvalidScore)
        );
        assert!(board.is_empty());
    }

    #[test]
    fn store_is_capped_and_keeps_the_best_entries() {
        let board = Leaderboard::new();
        for score in 0..=100u64 {
            board.submit("player", None, score as f64).unwrap();
        }
        assert_eq!(board.len(), 100);
        let top = board.top(100);
        // 101 submissions, the lowest (0) fell off; everything kept is >= 1.
        assert!(top.iter().all(|e| e.score >= 1));
        assert_eq!(top[0].score, 100);
    }

    #[test]
    fn listing_is_in_non_increasing_score_order() {
        let board = Leaderboard::new();
        for score in [12.0, 99.0, 5.0, 47.0, 99.0, 0.0] {
            board.submit("p", None, score).unwrap();
        }
        let top = board.top(50);
        for pair in top.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn ties_keep_the_earlier_submission_first() {
        let board = Leaderboard::new();
        board.submit("first", None, 50.0).unwrap();
        board.submit("second", None, 50.0).unwrap();
        let top = board.top(2);
        assert_eq!(top[0].username, "first");
        assert_eq!(top[1].username, "second");
    }

    #[test]
    fn empty_username_becomes_anonymous() {
        let board = Leaderboard::new();
        board.submit("", None, 1.0).unwrap();
        assert_eq!(board.top(1)[0].username, "anonymous");
    }

    #[test]
    fn top_limits_the_page_size() {
        let board = Leaderboard::new();
        for score in 0..10 {
            board.submit("p", None, score as f64).unwrap();
        }
        assert_eq!(board.top(3).len(), 3);
        assert_eq!(board.top(50).len(), 10);
    }

    #[test]
    fn address_is_preserved() {
        let board = Leaderboard::new();
        board
            .submit("p", Some("0xabc".to_string()), 7.0)
            .unwrap();
        assert_eq!(board.top(1)[0].address.as_deref(), Some("0xabc"));
    }
}
