use core::fmt;

use crate::config::Difficulty;

/// Invariants checked by `RunState::validate_invariants`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCode {
    PhaseLivesConsistency,
    LivesRange,
    AvatarBounds,
    AvatarFinite,
    GaugeCharge,
    ObstacleGeometry,
    ObstacleOrder,
    ScoreBelowPassed,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhaseLivesConsistency => write!(f, "PHASE_LIVES_CONSISTENCY"),
            Self::LivesRange => write!(f, "LIVES_RANGE"),
            Self::AvatarBounds => write!(f, "AVATAR_BOUNDS"),
            Self::AvatarFinite => write!(f, "AVATAR_FINITE"),
            Self::GaugeCharge => write!(f, "GAUGE_CHARGE"),
            Self::ObstacleGeometry => write!(f, "OBSTACLE_GEOMETRY"),
            Self::ObstacleOrder => write!(f, "OBSTACLE_ORDER"),
            Self::ScoreBelowPassed => write!(f, "SCORE_BELOW_PASSED"),
        }
    }
}

impl std::error::Error for RuleCode {}

/// Rejected configuration. Raised when a `RunState` or a gate is built, never
/// mid-run.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NonFinite { field: &'static str },
    NonPositive { field: &'static str, value: f32 },
    Negative { field: &'static str, value: f32 },
    InvertedRange { field: &'static str, min: f32, max: f32 },
    EyeThresholdsInverted { close: f32, open: f32 },
    GapOutsideWindow { min: i32, max: i32, window_height: f32 },
    StartingLivesOutOfRange { starting: u32, max: u32 },
    AvatarOutsideWindow { x: f32, radius: f32 },
    Preset { difficulty: Difficulty, source: Box<ConfigError> },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { field } => write!(f, "{field} must be finite"),
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be > 0, got {value}")
            }
            Self::Negative { field, value } => write!(f, "{field} must be >= 0, got {value}"),
            Self::InvertedRange { field, min, max } => {
                write!(f, "{field} range inverted: min={min} > max={max}")
            }
            Self::EyeThresholdsInverted { close, open } => write!(
                f,
                "eye close threshold ({close}) must be below open threshold ({open})"
            ),
            Self::GapOutsideWindow {
                min,
                max,
                window_height,
            } => write!(
                f,
                "gap centre range [{min}, {max}] does not fit window height {window_height}"
            ),
            Self::StartingLivesOutOfRange { starting, max } => {
                write!(f, "starting lives {starting} outside 1..={max}")
            }
            Self::AvatarOutsideWindow { x, radius } => {
                write!(f, "avatar (x={x}, radius={radius}) does not fit the window")
            }
            Self::Preset { difficulty, source } => {
                write!(f, "{difficulty} preset: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Preset { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ScoreStoreError {
    Io(std::io::Error),
    Corrupt(String),
}

impl fmt::Display for ScoreStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "score store i/o failed: {err}"),
            Self::Corrupt(detail) => write!(f, "score store is corrupt: {detail}"),
        }
    }
}

impl std::error::Error for ScoreStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Corrupt(_) => None,
        }
    }
}

impl From<std::io::Error> for ScoreStoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
