//! File-backed best scores: one JSON object mapping difficulty to score.

use mouthy_bird_core::config::Difficulty;
use mouthy_bird_core::error::ScoreStoreError;
use mouthy_bird_core::scores::BestScoreStore;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub type ScoreTable = BTreeMap<Difficulty, u32>;

#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty table. An unreadable one is logged and
    /// also treated as empty so a damaged file never blocks play.
    pub fn load_scores(&self) -> Result<ScoreTable, ScoreStoreError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(ScoreTable::new()),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_slice::<ScoreTable>(&data) {
            Ok(table) => Ok(table),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "ignoring unreadable score file: {err}"
                );
                Ok(ScoreTable::new())
            }
        }
    }

    pub fn save_scores(&self, scores: &ScoreTable) -> Result<(), ScoreStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let encoded = serde_json::to_vec_pretty(scores)
            .map_err(|err| ScoreStoreError::Corrupt(err.to_string()))?;
        fs::write(&self.path, encoded)?;
        Ok(())
    }
}

impl BestScoreStore for JsonScoreStore {
    fn load_best(&self, difficulty: Difficulty) -> Result<u32, ScoreStoreError> {
        Ok(self
            .load_scores()?
            .get(&difficulty)
            .copied()
            .unwrap_or(0))
    }

    fn update_best(&mut self, difficulty: Difficulty, score: u32) -> Result<u32, ScoreStoreError> {
        let mut scores = self.load_scores()?;
        let previous = scores.get(&difficulty).copied().unwrap_or(0);
        if score > previous {
            scores.insert(difficulty, score);
            self.save_scores(&scores)?;
        }
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_zero() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonScoreStore::new(dir.path().join("nested/scores.json"));
        assert_eq!(store.load_best(Difficulty::Normal)?, 0);
        Ok(())
    }

    #[test]
    fn update_persists_only_improvements() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data/scores.json");
        let mut store = JsonScoreStore::new(&path);

        assert_eq!(store.update_best(Difficulty::Easy, 12)?, 0);
        assert_eq!(store.update_best(Difficulty::Easy, 5)?, 12);
        assert_eq!(store.update_best(Difficulty::Hard, 3)?, 0);

        let reopened = JsonScoreStore::new(&path);
        assert_eq!(reopened.load_best(Difficulty::Easy)?, 12);
        assert_eq!(reopened.load_best(Difficulty::Hard)?, 3);

        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path)?)?;
        assert_eq!(raw["EASY"], 12);
        Ok(())
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("scores.json");
        fs::write(&path, b"{not json")?;
        let mut store = JsonScoreStore::new(&path);
        assert_eq!(store.load_best(Difficulty::Normal)?, 0);
        assert_eq!(store.update_best(Difficulty::Normal, 4)?, 0);
        assert_eq!(store.load_best(Difficulty::Normal)?, 4);
        Ok(())
    }
}
