use std::collections::BTreeMap;

use crate::config::Difficulty;
use crate::error::ScoreStoreError;

/// Per-difficulty best-score persistence. The storage format belongs to the
/// implementor.
pub trait BestScoreStore {
    fn load_best(&self, difficulty: Difficulty) -> Result<u32, ScoreStoreError>;

    /// Stores `score` if it beats the current best. Returns the best as it
    /// was before this call.
    fn update_best(&mut self, difficulty: Difficulty, score: u32) -> Result<u32, ScoreStoreError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryScoreStore {
    scores: BTreeMap<Difficulty, u32>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scores(&self) -> &BTreeMap<Difficulty, u32> {
        &self.scores
    }
}

impl BestScoreStore for MemoryScoreStore {
    fn load_best(&self, difficulty: Difficulty) -> Result<u32, ScoreStoreError> {
        Ok(self.scores.get(&difficulty).copied().unwrap_or(0))
    }

    fn update_best(&mut self, difficulty: Difficulty, score: u32) -> Result<u32, ScoreStoreError> {
        let previous = self.load_best(difficulty)?;
        if score > previous {
            self.scores.insert(difficulty, score);
        }
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_returns_previous_and_keeps_max() {
        let mut store = MemoryScoreStore::new();
        assert_eq!(store.update_best(Difficulty::Hard, 7).unwrap(), 0);
        assert_eq!(store.update_best(Difficulty::Hard, 3).unwrap(), 7);
        assert_eq!(store.load_best(Difficulty::Hard).unwrap(), 7);
        assert_eq!(store.load_best(Difficulty::Easy).unwrap(), 0);
    }
}
