use crate::autopilot::{create_bot, FaceBot};
use crate::frames::{frame_delta, FrameScript, ScriptFrame};
use anyhow::{anyhow, Context, Result};
use mouthy_bird_core::scores::BestScoreStore;
use mouthy_bird_core::sim::{replay, BestScoreUpdate, ReplayResult};
use mouthy_bird_core::{Difficulty, GameConfig, GestureSignalExtractor, RunState};
use serde::Serialize;
use std::path::Path;

/// Upper bound on the up-front script buffer; longer runs grow it on demand.
const PREALLOCATED_FRAMES: u32 = 1 << 16;

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub bot_id: String,
    pub difficulty: Difficulty,
    pub seed: u32,
    pub fps: u32,
    pub max_seconds: u32,
    pub frame_count: u32,
    pub elapsed: f64,
    pub final_score: u32,
    pub final_lives: u32,
    pub final_rng_state: u32,
    pub game_over: bool,
    pub lives_lost: u32,
    pub lives_gained: u32,
    pub blink_edges: u32,
    pub mouth_open_frames: u32,
    pub eyes_closed_frames: u32,
    pub missing_frames: u32,
    pub obstacles_spawned: u32,
}

#[derive(Clone, Debug)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    pub script: FrameScript,
    /// Present when a store was supplied and the run ended.
    pub best: Option<BestScoreUpdate>,
}

#[derive(Clone, Copy, Debug)]
pub struct RunLimits {
    pub max_seconds: u32,
    pub fps: u32,
}

impl RunLimits {
    fn validate(self) -> Result<Self> {
        if self.fps == 0 {
            return Err(anyhow!("fps must be > 0"));
        }
        if self.max_seconds == 0 {
            return Err(anyhow!("max_seconds must be > 0"));
        }
        Ok(self)
    }

    pub fn max_frames(self) -> u32 {
        self.max_seconds.saturating_mul(self.fps)
    }
}

pub fn run_bot(
    bot_id: &str,
    config: GameConfig,
    difficulty: Difficulty,
    seed: u32,
    limits: RunLimits,
    store: Option<&mut dyn BestScoreStore>,
) -> Result<RunArtifact> {
    let mut bot = create_bot(bot_id).ok_or_else(|| anyhow!("unknown bot '{bot_id}'"))?;
    run_bot_instance(bot.as_mut(), config, difficulty, seed, limits, store)
}

pub fn run_bot_instance(
    bot: &mut dyn FaceBot,
    config: GameConfig,
    difficulty: Difficulty,
    seed: u32,
    limits: RunLimits,
    store: Option<&mut dyn BestScoreStore>,
) -> Result<RunArtifact> {
    let limits = limits.validate()?;
    bot.reset(seed);

    let mut run = RunState::seeded(config, difficulty, seed)
        .map_err(|err| anyhow!("invalid game config: {err}"))?;
    run.validate_invariants()
        .map_err(|rule| anyhow!("initial invariant failure: {rule}"))?;

    let max_frames = limits.max_frames();
    let fps = f64::from(limits.fps);
    let mut frames = Vec::with_capacity(max_frames.min(PREALLOCATED_FRAMES) as usize);
    let mut last_t = 0.0f64;
    let mut metrics = RunMetrics {
        bot_id: bot.id().to_string(),
        difficulty,
        seed,
        fps: limits.fps,
        max_seconds: limits.max_seconds,
        frame_count: 0,
        elapsed: 0.0,
        final_score: 0,
        final_lives: 0,
        final_rng_state: 0,
        game_over: false,
        lives_lost: 0,
        lives_gained: 0,
        blink_edges: 0,
        mouth_open_frames: 0,
        eyes_closed_frames: 0,
        missing_frames: 0,
        obstacles_spawned: 0,
    };

    let mut index = 1u32;
    while index <= max_frames && !run.is_over() {
        let t = f64::from(index) / fps;
        let ratios = bot.next_face(&run.snapshot());
        let outcome = run.tick_frame(frame_delta(last_t, t), ratios);
        last_t = t;
        frames.push(ScriptFrame {
            t,
            landmarks: None,
            ratios,
        });

        let gestures = run.gesture_state();
        metrics.lives_lost += u32::from(outcome.life_lost);
        metrics.lives_gained += outcome.lives_gained;
        metrics.blink_edges += u32::from(outcome.blink_edge);
        metrics.mouth_open_frames += u32::from(gestures.mouth_open);
        metrics.eyes_closed_frames += u32::from(gestures.eyes_closed);
        metrics.missing_frames += u32::from(!outcome.observed);
        metrics.obstacles_spawned += u32::from(outcome.spawned);
        index += 1;
    }

    metrics.frame_count = run.frame_count();
    metrics.elapsed = run.elapsed();
    metrics.final_score = run.score();
    metrics.final_lives = run.lives();
    metrics.final_rng_state = run.rng().state();
    metrics.game_over = run.is_over();

    let script = FrameScript {
        frame_width: config.world.window_width,
        frame_height: config.world.window_height,
        normalized: false,
        frames,
    };

    let check = replay_script(config, difficulty, seed, &script)?;
    if check.final_score != metrics.final_score
        || check.frame_count != metrics.frame_count
        || check.final_rng_state != metrics.final_rng_state
    {
        return Err(anyhow!(
            "recorded script does not replay: score {} vs {}, frames {} vs {}",
            check.final_score,
            metrics.final_score,
            check.frame_count,
            metrics.frame_count
        ));
    }

    let best = match store {
        Some(store) => run
            .record_best(store)
            .context("failed recording best score")?,
        None => None,
    };

    tracing::debug!(
        bot = %metrics.bot_id,
        seed,
        score = metrics.final_score,
        frames = metrics.frame_count,
        "bot run finished"
    );

    Ok(RunArtifact {
        metrics,
        script,
        best,
    })
}

pub fn replay_script(
    config: GameConfig,
    difficulty: Difficulty,
    seed: u32,
    script: &FrameScript,
) -> Result<ReplayResult> {
    script.validate()?;
    let frames = script.to_replay_frames(&GestureSignalExtractor::default());
    replay(config, difficulty, seed, &frames).map_err(|err| anyhow!("invalid game config: {err}"))
}

pub fn write_script(path: &Path, script: &FrameScript) -> Result<()> {
    crate::util::write_json(path, script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mouthy_bird_core::scores::MemoryScoreStore;

    const SHORT: RunLimits = RunLimits {
        max_seconds: 20,
        fps: 30,
    };

    #[test]
    fn idle_bot_dies_and_records_once() {
        let mut store = MemoryScoreStore::new();
        let artifact = run_bot(
            "idle",
            GameConfig::default(),
            Difficulty::Normal,
            7,
            SHORT,
            Some(&mut store),
        )
        .expect("run");
        assert!(artifact.metrics.game_over);
        assert_eq!(artifact.metrics.final_lives, 0);
        assert_eq!(artifact.metrics.mouth_open_frames, 0);
        let best = artifact.best.expect("recorded");
        assert_eq!(best.previous_best, 0);
        assert_eq!(store.load_best(Difficulty::Normal).expect("load"), best.best);
    }

    #[test]
    fn zero_limits_are_rejected() {
        let limits = RunLimits {
            max_seconds: 0,
            fps: 30,
        };
        assert!(run_bot("pilot", GameConfig::default(), Difficulty::Easy, 1, limits, None).is_err());
        assert!(run_bot("nobody", GameConfig::default(), Difficulty::Easy, 1, SHORT, None).is_err());
    }

    #[test]
    fn huge_session_cap_starts_without_reserving_it() {
        let limits = RunLimits {
            max_seconds: u32::MAX,
            fps: 60,
        };
        assert_eq!(limits.max_frames(), u32::MAX);
        let artifact = run_bot("idle", GameConfig::default(), Difficulty::Hard, 5, limits, None)
            .expect("run");
        assert!(artifact.metrics.game_over);
        assert_eq!(
            artifact.script.frames.len() as u32,
            artifact.metrics.frame_count
        );
    }

    #[test]
    fn script_frames_match_tick_count() {
        let artifact = run_bot(
            "flaky",
            GameConfig::default(),
            Difficulty::Hard,
            0xBEEF,
            SHORT,
            None,
        )
        .expect("run");
        assert_eq!(
            artifact.script.frames.len() as u32,
            artifact.metrics.frame_count
        );
        let missing = artifact
            .script
            .frames
            .iter()
            .filter(|frame| frame.ratios.is_none())
            .count() as u32;
        assert_eq!(missing, artifact.metrics.missing_frames);
    }
}
