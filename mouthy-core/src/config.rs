//! Immutable game configuration and the per-difficulty parameter table.
//!
//! `GameConfig` is consumed once by `RunState::new`; nothing reads it from
//! process-wide state. Every struct deserialises with `#[serde(default)]`, so
//! a JSON override only needs the fields it changes.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    AVATAR_RADIUS, AVATAR_X, DT_CLAMP, EYE_CLOSE_THRESHOLD, EYE_OPEN_THRESHOLD, INVINCIBLE_SECS,
    LIFE_GAUGE_COOLDOWN_SECS, LIFE_GAUGE_UNIT, LIFE_MAX, MOUTH_OPEN_THRESHOLD, PIPE_GAP_MAX_Y,
    PIPE_GAP_MIN_Y, PIPE_SPAWN_MARGIN, PIPE_WIDTH, STARTING_LIVES, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Normal => "NORMAL",
            Self::Hard => "HARD",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "EASY" => Ok(Self::Easy),
            "NORMAL" => Ok(Self::Normal),
            "HARD" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty '{other}' (expected easy|normal|hard)")),
        }
    }
}

/// One row of the difficulty table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Downward acceleration while the mouth is closed (px/s^2).
    pub gravity: f32,
    /// Upward acceleration while the mouth is open (px/s^2).
    pub thrust: f32,
    /// Leftward obstacle speed (px/s).
    pub scroll_speed: f32,
    pub spawn_interval_min: f32,
    pub spawn_interval_max: f32,
    pub pipe_gap_height: f32,
    /// Gauge charge per second of closed eyes.
    pub life_gauge_rate: f32,
}

impl DifficultyParams {
    pub fn easy() -> Self {
        Self {
            gravity: 420.0,
            thrust: 560.0,
            scroll_speed: 180.0,
            spawn_interval_min: 1.8,
            spawn_interval_max: 2.2,
            pipe_gap_height: 200.0,
            life_gauge_rate: 0.35,
        }
    }

    pub fn normal() -> Self {
        Self {
            gravity: 500.0,
            thrust: 600.0,
            scroll_speed: 220.0,
            spawn_interval_min: 1.6,
            spawn_interval_max: 1.6,
            pipe_gap_height: 170.0,
            life_gauge_rate: 0.25,
        }
    }

    pub fn hard() -> Self {
        Self {
            gravity: 560.0,
            thrust: 660.0,
            scroll_speed: 260.0,
            spawn_interval_min: 1.2,
            spawn_interval_max: 1.5,
            pipe_gap_height: 145.0,
            life_gauge_rate: 0.15,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("gravity", self.gravity)?;
        positive("thrust", self.thrust)?;
        positive("scroll_speed", self.scroll_speed)?;
        positive("spawn_interval_min", self.spawn_interval_min)?;
        positive("spawn_interval_max", self.spawn_interval_max)?;
        positive("pipe_gap_height", self.pipe_gap_height)?;
        non_negative("life_gauge_rate", self.life_gauge_rate)?;
        if self.spawn_interval_min > self.spawn_interval_max {
            return Err(ConfigError::InvertedRange {
                field: "spawn_interval",
                min: self.spawn_interval_min,
                max: self.spawn_interval_max,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTable {
    pub easy: DifficultyParams,
    pub normal: DifficultyParams,
    pub hard: DifficultyParams,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyParams::easy(),
            normal: DifficultyParams::normal(),
            hard: DifficultyParams::hard(),
        }
    }
}

impl DifficultyTable {
    pub fn get(&self, difficulty: Difficulty) -> &DifficultyParams {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn get_mut(&mut self, difficulty: Difficulty) -> &mut DifficultyParams {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Normal => &mut self.normal,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

/// Playfield geometry and the per-tick integration bound.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub window_width: f32,
    pub window_height: f32,
    pub avatar_x: f32,
    pub avatar_radius: f32,
    pub dt_clamp: f32,
    pub pipe_width: f32,
    pub gap_center_min: i32,
    pub gap_center_max: i32,
    /// Obstacles appear this far past the right edge.
    pub spawn_margin: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            avatar_x: AVATAR_X,
            avatar_radius: AVATAR_RADIUS,
            dt_clamp: DT_CLAMP,
            pipe_width: PIPE_WIDTH,
            gap_center_min: PIPE_GAP_MIN_Y,
            gap_center_max: PIPE_GAP_MAX_Y,
            spawn_margin: PIPE_SPAWN_MARGIN,
        }
    }
}

impl WorldConfig {
    pub fn spawn_x(&self) -> f32 {
        self.window_width + self.spawn_margin
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    pub eye_close: f32,
    pub eye_open: f32,
    pub mouth_open: f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            eye_close: EYE_CLOSE_THRESHOLD,
            eye_open: EYE_OPEN_THRESHOLD,
            mouth_open: MOUTH_OPEN_THRESHOLD,
        }
    }
}

impl GestureThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("eye_close", self.eye_close)?;
        finite("eye_open", self.eye_open)?;
        finite("mouth_open", self.mouth_open)?;
        if self.eye_close >= self.eye_open {
            return Err(ConfigError::EyeThresholdsInverted {
                close: self.eye_close,
                open: self.eye_open,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeRules {
    pub starting_lives: u32,
    pub max_lives: u32,
    pub invincible_secs: f32,
    /// Gauge charge exchanged for one life.
    pub gauge_unit: f32,
    /// Pause after a payout during which the gauge ignores closed eyes.
    pub gauge_cooldown_secs: f32,
}

impl Default for LifeRules {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            max_lives: LIFE_MAX,
            invincible_secs: INVINCIBLE_SECS,
            gauge_unit: LIFE_GAUGE_UNIT,
            gauge_cooldown_secs: LIFE_GAUGE_COOLDOWN_SECS,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub gestures: GestureThresholds,
    pub lives: LifeRules,
    pub difficulties: DifficultyTable,
}

impl GameConfig {
    pub fn params(&self, difficulty: Difficulty) -> &DifficultyParams {
        self.difficulties.get(difficulty)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        positive("window_width", world.window_width)?;
        positive("window_height", world.window_height)?;
        positive("avatar_radius", world.avatar_radius)?;
        positive("dt_clamp", world.dt_clamp)?;
        positive("pipe_width", world.pipe_width)?;
        non_negative("spawn_margin", world.spawn_margin)?;
        finite("avatar_x", world.avatar_x)?;

        if world.avatar_radius * 2.0 > world.window_height
            || world.avatar_x < 0.0
            || world.avatar_x > world.window_width
        {
            return Err(ConfigError::AvatarOutsideWindow {
                x: world.avatar_x,
                radius: world.avatar_radius,
            });
        }

        if world.gap_center_min > world.gap_center_max
            || world.gap_center_min < 0
            || world.gap_center_max as f32 > world.window_height
        {
            return Err(ConfigError::GapOutsideWindow {
                min: world.gap_center_min,
                max: world.gap_center_max,
                window_height: world.window_height,
            });
        }

        self.gestures.validate()?;

        let lives = &self.lives;
        if lives.starting_lives == 0 || lives.starting_lives > lives.max_lives {
            return Err(ConfigError::StartingLivesOutOfRange {
                starting: lives.starting_lives,
                max: lives.max_lives,
            });
        }
        non_negative("invincible_secs", lives.invincible_secs)?;
        positive("gauge_unit", lives.gauge_unit)?;
        non_negative("gauge_cooldown_secs", lives.gauge_cooldown_secs)?;

        for difficulty in Difficulty::ALL {
            self.params(difficulty)
                .validate()
                .map_err(|source| ConfigError::Preset {
                    difficulty,
                    source: Box::new(source),
                })?;
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
