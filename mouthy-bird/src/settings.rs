use std::env;
use std::path::PathBuf;

pub const DEFAULT_SCORES_PATH: &str = "data/scores.json";
pub const DEFAULT_FPS: u32 = 30;
pub const DEFAULT_SESSION_SECS: u32 = 120;

/// Process-level knobs that are not part of the game rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub scores_path: PathBuf,
    pub fps: u32,
    pub session_secs: u32,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            scores_path: env::var("MOUTHY_SCORES_PATH")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORES_PATH)),
            fps: read_env_u32("MOUTHY_FPS", DEFAULT_FPS),
            session_secs: read_env_u32("MOUTHY_SESSION_SECS", DEFAULT_SESSION_SECS),
        }
    }
}

pub fn read_env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}
