//! Per-channel gesture gates.
//!
//! Eyes use a two-threshold band so a ratio hovering between the thresholds
//! holds the previous state. The mouth is a plain level detector.

use serde::{Deserialize, Serialize};

use crate::config::GestureThresholds;
use crate::error::ConfigError;
use crate::gesture::GestureRatios;

/// Latched gesture booleans, persisted across frames for a whole run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureState {
    pub eyes_closed: bool,
    pub mouth_open: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EyeUpdate {
    pub is_closed: bool,
    /// Set only on the tick the gate went open -> closed.
    pub became_closed: bool,
}

/// Outcome of feeding one frame (or its absence) through both gates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GateOutput {
    pub state: GestureState,
    pub blink_edge: bool,
    pub observed: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct HysteresisGate {
    thresholds: GestureThresholds,
    state: GestureState,
}

impl HysteresisGate {
    pub fn new(thresholds: GestureThresholds) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        Ok(Self::from_validated(thresholds))
    }

    pub(crate) fn from_validated(thresholds: GestureThresholds) -> Self {
        Self {
            thresholds,
            state: GestureState::default(),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn thresholds(&self) -> &GestureThresholds {
        &self.thresholds
    }

    pub fn update_eyes(&mut self, ear: f32) -> EyeUpdate {
        let was_closed = self.state.eyes_closed;
        if !was_closed && ear < self.thresholds.eye_close {
            self.state.eyes_closed = true;
        } else if was_closed && ear > self.thresholds.eye_open {
            self.state.eyes_closed = false;
        }

        EyeUpdate {
            is_closed: self.state.eyes_closed,
            became_closed: !was_closed && self.state.eyes_closed,
        }
    }

    pub fn update_mouth(&mut self, mar: f32) -> bool {
        self.state.mouth_open = mar > self.thresholds.mouth_open;
        self.state.mouth_open
    }

    /// Runs both gates. A missing observation leaves the latched state
    /// untouched and never emits an edge.
    pub fn observe(&mut self, ratios: Option<GestureRatios>) -> GateOutput {
        let Some(ratios) = ratios else {
            return GateOutput {
                state: self.state,
                blink_edge: false,
                observed: false,
            };
        };

        let eyes = self.update_eyes(ratios.eye_aspect_ratio);
        self.update_mouth(ratios.mouth_aspect_ratio);

        GateOutput {
            state: self.state,
            blink_edge: eyes.became_closed,
            observed: true,
        }
    }
}
