//! High score bookkeeping
//!
//! The best score is persisted as a decimal string under a single key.

use serde::{Deserialize, Serialize};

use crate::persistence::Storage;

/// Storage key for the best score
pub const STORAGE_KEY: &str = "gemini-wings-high-score";

/// Current round score and best score so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub current: u32,
    /// Never decreases during the process lifetime
    pub high: u32,
}

impl ScoreRecord {
    /// Start from the persisted best score
    pub fn load(storage: &impl Storage) -> Self {
        Self {
            current: 0,
            high: load_high_score(storage),
        }
    }

    /// Close a round; returns the best score from before it
    pub fn finish_round(&mut self, final_score: u32) -> u32 {
        let prior = self.high;
        self.current = final_score;
        self.high = self.high.max(final_score);
        prior
    }
}

/// Persisted best score; absent or garbage reads as 0
pub fn load_high_score(storage: &impl Storage) -> u32 {
    let Some(raw) = storage.get(STORAGE_KEY) else {
        log::info!("No high score found, starting fresh");
        return 0;
    };
    match raw.trim().parse::<u32>() {
        Ok(high) => {
            log::info!("Loaded high score {}", high);
            high
        }
        Err(e) => {
            log::warn!("Ignoring corrupt high score {:?}: {}", raw, e);
            0
        }
    }
}

/// Persist the best score; failures are logged and otherwise ignored
pub fn save_high_score(storage: &mut impl Storage, high: u32) {
    match storage.set(STORAGE_KEY, &high.to_string()) {
        Ok(()) => log::info!("High score saved ({})", high),
        Err(e) => log::warn!("Failed to save high score {}: {}", high, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_absent_high_score_is_zero() {
        let record = ScoreRecord::load(&MemoryStorage::new());
        assert_eq!(record, ScoreRecord { current: 0, high: 0 });
    }

    #[test]
    fn test_corrupt_high_score_is_zero() {
        let mut storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, "lots").unwrap();
        assert_eq!(load_high_score(&storage), 0);
        storage.set(STORAGE_KEY, "-4").unwrap();
        assert_eq!(load_high_score(&storage), 0);
    }

    #[test]
    fn test_saved_high_score_is_decimal() {
        let mut storage = MemoryStorage::new();
        save_high_score(&mut storage, 7);
        assert_eq!(storage.get(STORAGE_KEY).as_deref(), Some("7"));
        assert_eq!(load_high_score(&storage), 7);
    }

    #[test]
    fn test_finish_round_keeps_best() {
        let mut record = ScoreRecord { current: 0, high: 10 };
        assert_eq!(record.finish_round(4), 10);
        assert_eq!(record, ScoreRecord { current: 4, high: 10 });
        assert_eq!(record.finish_round(12), 10);
        assert_eq!(record, ScoreRecord { current: 12, high: 12 });
    }
}
