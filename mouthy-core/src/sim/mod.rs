//! Per-match simulation: the `RunState` state machine and the read-only
//! views it hands to renderers and drivers.

use serde::{Deserialize, Serialize};

use crate::config::{Difficulty, GameConfig};
use crate::error::ConfigError;
use crate::gate::GestureState;
use crate::gesture::GestureRatios;
use crate::obstacles::Obstacle;
use crate::rng::SeededRng;

mod run;

pub use run::RunState;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    #[default]
    Alive,
    Over,
}

/// What happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickOutcome {
    pub frame_count: u32,
    /// Delta actually integrated, after clamping.
    pub dt: f32,
    pub score_delta: u32,
    pub hit: bool,
    pub life_lost: bool,
    pub lives_gained: u32,
    pub spawned: bool,
    pub retired: usize,
    pub blink_edge: bool,
    pub observed: bool,
    /// True only on the tick that ended the run.
    pub game_over: bool,
    /// The run was already over; nothing moved.
    pub frozen: bool,
}

/// Everything a renderer needs between ticks.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSnapshot {
    pub frame_count: u32,
    pub elapsed: f64,
    pub difficulty: Difficulty,
    pub phase: RunPhase,
    pub score: u32,
    pub lives: u32,
    pub max_lives: u32,
    pub avatar_x: f32,
    pub avatar_y: f32,
    pub avatar_vy: f32,
    pub avatar_radius: f32,
    pub obstacles: Vec<Obstacle>,
    pub fill_ratio: f32,
    pub gauge_charge: f32,
    pub is_invincible: bool,
    pub invincible_remaining: f32,
    pub gestures: GestureState,
}

impl RunSnapshot {
    pub fn is_over(&self) -> bool {
        matches!(self.phase, RunPhase::Over)
    }

    /// First obstacle whose trailing edge is still at or right of the avatar.
    pub fn next_obstacle(&self) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .find(|entry| entry.trailing_edge() >= self.avatar_x - self.avatar_radius)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BestScoreUpdate {
    pub previous_best: u32,
    pub best: u32,
    pub is_new_best: bool,
}

/// One recorded frame: the wall-clock delta and what the gates would see.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub dt: f32,
    pub ratios: Option<GestureRatios>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReplayResult {
    pub final_score: u32,
    pub final_lives: u32,
    pub frame_count: u32,
    pub elapsed: f64,
    pub phase: RunPhase,
    pub final_rng_state: u32,
}

/// Replays frames through a fresh seeded run. Frames after game over are
/// ignored.
pub fn replay(
    config: GameConfig,
    difficulty: Difficulty,
    seed: u32,
    frames: &[ReplayFrame],
) -> Result<ReplayResult, ConfigError> {
    let mut run = RunState::new(config, difficulty, SeededRng::new(seed))?;
    for frame in frames {
        if run.is_over() {
            break;
        }
        run.tick_frame(frame.dt, frame.ratios);
    }
    Ok(ReplayResult {
        final_score: run.score(),
        final_lives: run.lives(),
        frame_count: run.frame_count(),
        elapsed: run.elapsed(),
        phase: run.phase(),
        final_rng_state: run.rng().state(),
    })
}
