//! Recorded frame scripts: what the capture + inference pipeline would hand
//! the engine, one entry per camera frame.

use anyhow::{anyhow, Context, Result};
use mouthy_bird_core::gesture::{GestureSignalExtractor, LandmarkSet};
use mouthy_bird_core::sim::ReplayFrame;
use mouthy_bird_core::GestureRatios;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameScript {
    pub frame_width: f32,
    pub frame_height: f32,
    /// Landmarks are `[0, 1]` model coordinates rather than window pixels.
    #[serde(default)]
    pub normalized: bool,
    pub frames: Vec<ScriptFrame>,
}

/// One camera frame. `landmarks` wins over `ratios` when both are present;
/// neither means no face was found.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptFrame {
    /// Capture timestamp in seconds since the run started.
    pub t: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Vec<[f32; 2]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratios: Option<GestureRatios>,
}

impl FrameScript {
    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read(path).with_context(|| format!("failed reading script {}", path.display()))?;
        let script: FrameScript = serde_json::from_slice(&data)
            .with_context(|| format!("failed parsing script {}", path.display()))?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<()> {
        if self.normalized && (self.frame_width <= 0.0 || self.frame_height <= 0.0) {
            return Err(anyhow!(
                "normalized script needs positive frame size, got {}x{}",
                self.frame_width,
                self.frame_height
            ));
        }
        let mut last_t = 0.0;
        for (index, frame) in self.frames.iter().enumerate() {
            if !frame.t.is_finite() || frame.t < last_t {
                return Err(anyhow!(
                    "frame {index}: timestamp {} goes backwards (previous {last_t})",
                    frame.t
                ));
            }
            last_t = frame.t;
        }
        Ok(())
    }

    fn landmark_set(&self, points: &[[f32; 2]]) -> LandmarkSet {
        if self.normalized {
            let pairs: Vec<(f32, f32)> = points.iter().map(|p| (p[0], p[1])).collect();
            LandmarkSet::from_normalized(&pairs, self.frame_width, self.frame_height)
        } else {
            LandmarkSet::new(
                points
                    .iter()
                    .map(|p| mouthy_bird_core::Point::new(p[0], p[1]))
                    .collect(),
            )
        }
    }

    /// Converts timestamps to per-frame deltas and landmarks to ratios.
    pub fn to_replay_frames(&self, extractor: &GestureSignalExtractor) -> Vec<ReplayFrame> {
        let mut last_t = 0.0f64;
        self.frames
            .iter()
            .map(|frame| {
                let dt = frame_delta(last_t, frame.t);
                last_t = frame.t;
                let ratios = match &frame.landmarks {
                    Some(points) => extractor.extract(Some(&self.landmark_set(points))),
                    None => frame.ratios,
                };
                ReplayFrame { dt, ratios }
            })
            .collect()
    }
}

/// Delta between two capture timestamps. Recorders and replayers must share
/// this so a replay integrates the exact same deltas.
pub fn frame_delta(previous_t: f64, t: f64) -> f32 {
    (t - previous_t) as f32
}
