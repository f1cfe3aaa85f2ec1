//! Gesture-driven arcade simulation.
//!
//! Face landmarks become two aperture ratios (`gesture`), the ratios become
//! latched booleans (`gate`), and `sim::RunState` consumes those booleans
//! once per frame to move the avatar, scroll obstacles, score, and trade
//! closed-eye time for lives.

pub mod avatar;
pub mod config;
pub mod constants;
pub mod error;
pub mod gate;
pub mod gauge;
pub mod gesture;
pub mod obstacles;
pub mod rng;
pub mod scores;
pub mod sim;

pub use config::{Difficulty, DifficultyParams, GameConfig};
pub use error::{ConfigError, RuleCode, ScoreStoreError};
pub use gate::{GestureState, HysteresisGate};
pub use gesture::{GestureRatios, GestureSignalExtractor, LandmarkSet, Point};
pub use sim::{replay, RunPhase, RunSnapshot, RunState, TickOutcome};
