//! Longest-sequence leaderboard
//!
//! Persisted to LocalStorage, tracks the top 10 finished games. A game's
//! score is the sequence length it reached before the wrong cube.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Sequence length reached
    pub score: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "musical_bloom_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Index a score would be inserted at; ties go below existing entries
    fn insertion_index(&self, score: u32) -> usize {
        self.entries.partition_point(|e| e.score >= score)
    }

    /// A score qualifies if it is non-zero and lands inside the top 10
    pub fn qualifies(&self, score: u32) -> bool {
        score > 0 && self.insertion_index(score) < MAX_HIGH_SCORES
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        self.qualifies(score)
            .then(|| self.insertion_index(score) + 1)
    }

    /// Record a finished game; returns the rank achieved if it qualified
    pub fn add_score(&mut self, score: u32, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries
            .insert(rank - 1, HighScoreEntry { score, timestamp });
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match crate::platform::storage::load::<HighScores>(Self::STORAGE_KEY) {
            Some(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        if crate::platform::storage::save(Self::STORAGE_KEY, self) {
            log::info!("High scores saved ({} entries)", self.entries.len());
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Describe how long ago something happened, `age_ms` milliseconds back
pub fn relative_age(age_ms: f64) -> String {
    const MINUTE: f64 = 60_000.0;
    const HOUR: f64 = 60.0 * MINUTE;
    const DAY: f64 = 24.0 * HOUR;

    let plural = |n: u64, unit: &str| {
        if n == 1 {
            format!("1 {} ago", unit)
        } else {
            format!("{} {}s ago", n, unit)
        }
    };

    match age_ms.max(0.0) {
        a if a >= 7.0 * DAY => plural((a / (7.0 * DAY)) as u64, "week"),
        a if a >= 2.0 * DAY => plural((a / DAY) as u64, "day"),
        a if a >= DAY => "Yesterday".to_string(),
        a if a >= HOUR => plural((a / HOUR) as u64, "hour"),
        a if a >= MINUTE => plural((a / MINUTE) as u64, "min"),
        _ => "Just now".to_string(),
    }
}

/// Format a timestamp relative to now
#[cfg(target_arch = "wasm32")]
pub fn format_date(timestamp: f64) -> String {
    relative_age(js_sys::Date::now() - timestamp)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn format_date(_timestamp: f64) -> String {
    "N/A".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score(0, 1.0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(3, 1.0), Some(1));
        assert_eq!(scores.add_score(7, 2.0), Some(1));
        assert_eq!(scores.add_score(5, 3.0), Some(2));
        // Ties rank below the existing entry
        assert_eq!(scores.add_score(5, 4.0), Some(3));

        let order: Vec<u32> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![7, 5, 5, 3]);
        assert_eq!(scores.top_score(), Some(7));
    }

    #[test]
    fn test_capped_at_max() {
        let mut scores = HighScores::new();
        for score in 1..=(MAX_HIGH_SCORES as u32 + 5) {
            scores.add_score(score, score as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert!(!scores.qualifies(5));
        assert_eq!(scores.potential_rank(100), Some(1));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(6));
    }

    #[test]
    fn test_relative_age() {
        assert_eq!(relative_age(-5.0), "Just now");
        assert_eq!(relative_age(59_000.0), "Just now");
        assert_eq!(relative_age(60_000.0), "1 min ago");
        assert_eq!(relative_age(5.5 * 60_000.0), "5 mins ago");
        assert_eq!(relative_age(3.0 * 3_600_000.0), "3 hours ago");
        assert_eq!(relative_age(30.0 * 3_600_000.0), "Yesterday");
        assert_eq!(relative_age(3.0 * 86_400_000.0), "3 days ago");
        assert_eq!(relative_age(15.0 * 86_400_000.0), "2 weeks ago");
    }
}
