use super::*;

use crate::avatar::AvatarBody;
use crate::config::DifficultyParams;
use crate::error::{RuleCode, ScoreStoreError};
use crate::gate::HysteresisGate;
use crate::gauge::LifeGauge;
use crate::gesture::{GestureSignalExtractor, LandmarkSet};
use crate::obstacles::ObstacleField;
use crate::rng::RandomSource;
use crate::scores::BestScoreStore;

/// One match. Owns every simulation entity; restart by replacing the value.
#[derive(Clone, Debug)]
pub struct RunState<R: RandomSource = SeededRng> {
    config: GameConfig,
    difficulty: Difficulty,
    params: DifficultyParams,
    phase: RunPhase,
    score: u32,
    lives: u32,
    invincible_until: f64,
    /// Sim clock in seconds: the sum of clamped deltas.
    elapsed: f64,
    frame_count: u32,
    avatar: AvatarBody,
    obstacles: ObstacleField,
    gauge: LifeGauge,
    gate: HysteresisGate,
    extractor: GestureSignalExtractor,
    signals: GestureState,
    spawn_timer: f32,
    spawn_interval: f32,
    best_recorded: bool,
    rng: R,
}

impl RunState<SeededRng> {
    pub fn seeded(
        config: GameConfig,
        difficulty: Difficulty,
        seed: u32,
    ) -> Result<Self, ConfigError> {
        Self::new(config, difficulty, SeededRng::new(seed))
    }
}

impl<R: RandomSource> RunState<R> {
    /// Validates `config` and starts a match. Invalid configuration is fatal
    /// here so ticks never see it.
    pub fn new(config: GameConfig, difficulty: Difficulty, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::fresh(config, difficulty, rng))
    }

    fn fresh(config: GameConfig, difficulty: Difficulty, mut rng: R) -> Self {
        let params = *config.params(difficulty);
        let lives = &config.lives;
        let gauge = LifeGauge::new(
            params.life_gauge_rate,
            lives.gauge_unit,
            lives.gauge_cooldown_secs,
            lives.max_lives,
        );
        let spawn_interval = rng.range_f32(params.spawn_interval_min, params.spawn_interval_max);

        tracing::debug!(
            difficulty = %difficulty,
            lives = lives.starting_lives,
            spawn_interval,
            "run started"
        );

        Self {
            config,
            difficulty,
            params,
            phase: RunPhase::Alive,
            score: 0,
            lives: config.lives.starting_lives,
            invincible_until: 0.0,
            elapsed: 0.0,
            frame_count: 0,
            avatar: AvatarBody::new(config.world.window_height * 0.5),
            obstacles: ObstacleField::new(),
            gauge,
            // Thresholds were validated with the rest of the config.
            gate: HysteresisGate::from_validated(config.gestures),
            extractor: GestureSignalExtractor::default(),
            signals: GestureState::default(),
            spawn_timer: 0.0,
            spawn_interval,
            best_recorded: false,
            rng,
        }
    }

    /// Fresh match with the same config and difficulty. The random stream
    /// continues rather than restarting.
    pub fn restart(self) -> Self {
        tracing::info!(score = self.score, difficulty = %self.difficulty, "restart");
        Self::fresh(self.config, self.difficulty, self.rng)
    }

    pub fn with_extractor(mut self, extractor: GestureSignalExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    #[inline]
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self.phase, RunPhase::Over)
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[inline]
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn params(&self) -> &DifficultyParams {
        &self.params
    }

    pub fn avatar(&self) -> &AvatarBody {
        &self.avatar
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn gauge(&self) -> &LifeGauge {
        &self.gauge
    }

    pub fn gesture_state(&self) -> GestureState {
        self.signals
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn invincible_until(&self) -> f64 {
        self.invincible_until
    }

    pub fn is_invincible(&self) -> bool {
        self.elapsed < self.invincible_until
    }

    pub fn snapshot(&self) -> RunSnapshot {
        let world = &self.config.world;
        RunSnapshot {
            frame_count: self.frame_count,
            elapsed: self.elapsed,
            difficulty: self.difficulty,
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            max_lives: self.config.lives.max_lives,
            avatar_x: world.avatar_x,
            avatar_y: self.avatar.y,
            avatar_vy: self.avatar.vy,
            avatar_radius: world.avatar_radius,
            obstacles: self.obstacles.obstacles().to_vec(),
            fill_ratio: self.gauge.fill_ratio(),
            gauge_charge: self.gauge.charge(),
            is_invincible: self.is_invincible(),
            invincible_remaining: (self.invincible_until - self.elapsed).max(0.0) as f32,
            gestures: self.signals,
        }
    }

    /// Runs landmarks through the extractor and gates, then ticks.
    pub fn tick_landmarks(&mut self, dt: f32, landmarks: Option<&LandmarkSet>) -> TickOutcome {
        let ratios = self.extractor.extract(landmarks);
        self.tick_frame(dt, ratios)
    }

    /// Runs already-extracted ratios through the gates, then ticks. `None`
    /// holds the previous gesture state but drives the avatar without thrust.
    pub fn tick_frame(&mut self, dt: f32, ratios: Option<GestureRatios>) -> TickOutcome {
        let gates = self.gate.observe(ratios);
        // A lost face never thrusts; the latched mouth state is only reported.
        let drive = GestureState {
            mouth_open: gates.observed && gates.state.mouth_open,
            ..gates.state
        };
        let mut outcome = self.tick(dt, drive);
        self.signals = gates.state;
        outcome.blink_edge = gates.blink_edge;
        outcome.observed = gates.observed;
        outcome
    }

    /// Advances the match by one frame.
    pub fn tick(&mut self, dt: f32, signals: GestureState) -> TickOutcome {
        self.signals = signals;

        if self.is_over() {
            return TickOutcome {
                frame_count: self.frame_count,
                frozen: true,
                ..TickOutcome::default()
            };
        }

        let dt = self.clamp_dt(dt);
        self.frame_count += 1;
        self.elapsed += f64::from(dt);
        let now = self.elapsed;
        let was_invincible = self.is_invincible();

        let mut outcome = TickOutcome {
            frame_count: self.frame_count,
            dt,
            ..TickOutcome::default()
        };

        let world = self.config.world;
        self.avatar.step(
            dt,
            signals.mouth_open,
            self.params.gravity,
            self.params.thrust,
            world.avatar_radius,
            world.window_height,
        );

        outcome.spawned = self.update_spawn_timer(dt);
        outcome.retired = self.obstacles.advance(dt, self.params.scroll_speed);

        let check = self.obstacles.check_score_and_collision(
            world.avatar_x,
            self.avatar.y,
            world.avatar_radius,
            world.window_height,
        );
        self.score += check.score_delta;
        outcome.score_delta = check.score_delta;
        outcome.hit = check.hit;

        if check.hit && !was_invincible {
            self.lives = self.lives.saturating_sub(1);
            self.invincible_until = now + f64::from(self.config.lives.invincible_secs);
            outcome.life_lost = true;
            tracing::info!(
                frame = self.frame_count,
                lives = self.lives,
                score = self.score,
                "life lost"
            );
        }

        let gained = self
            .gauge
            .update(signals.eyes_closed, dt, now, self.lives);
        if gained > 0 {
            self.lives = (self.lives + gained).min(self.config.lives.max_lives);
            outcome.lives_gained = gained;
            tracing::info!(
                frame = self.frame_count,
                gained,
                lives = self.lives,
                "life restored from gauge"
            );
        }

        if self.lives == 0 {
            self.phase = RunPhase::Over;
            outcome.game_over = true;
            tracing::info!(
                frame = self.frame_count,
                score = self.score,
                difficulty = %self.difficulty,
                "game over"
            );
        }

        debug_assert_eq!(self.validate_invariants(), Ok(()));
        outcome
    }

    fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.config.world.dt_clamp)
        } else {
            0.0
        }
    }

    fn update_spawn_timer(&mut self, dt: f32) -> bool {
        self.spawn_timer += dt;
        if self.spawn_timer < self.spawn_interval {
            return false;
        }

        self.spawn_timer = 0.0;
        let world = self.config.world;
        let obstacle = self.obstacles.spawn(
            world.spawn_x(),
            world.gap_center_min,
            world.gap_center_max,
            world.pipe_width,
            self.params.pipe_gap_height,
            &mut self.rng,
        );
        self.spawn_interval = self
            .rng
            .range_f32(self.params.spawn_interval_min, self.params.spawn_interval_max);

        tracing::debug!(
            frame = self.frame_count,
            gap_center_y = obstacle.gap_center_y,
            next_interval = self.spawn_interval,
            "obstacle spawned"
        );
        true
    }

    /// Hands the final score to `store` once the match is over. Later calls
    /// (and calls while alive) return `Ok(None)`.
    pub fn record_best<S: BestScoreStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<Option<BestScoreUpdate>, ScoreStoreError> {
        if !self.is_over() || self.best_recorded {
            return Ok(None);
        }

        let previous_best = store.update_best(self.difficulty, self.score)?;
        self.best_recorded = true;
        let update = BestScoreUpdate {
            previous_best,
            best: previous_best.max(self.score),
            is_new_best: self.score > previous_best,
        };
        tracing::info!(
            difficulty = %self.difficulty,
            score = self.score,
            previous_best,
            "best score recorded"
        );
        Ok(Some(update))
    }

    pub fn validate_invariants(&self) -> Result<(), RuleCode> {
        let consistent = match self.phase {
            RunPhase::Alive => self.lives > 0,
            RunPhase::Over => self.lives == 0,
        };
        if !consistent {
            return Err(RuleCode::PhaseLivesConsistency);
        }

        if self.lives > self.config.lives.max_lives {
            return Err(RuleCode::LivesRange);
        }

        if !self.avatar.y.is_finite() || !self.avatar.vy.is_finite() {
            return Err(RuleCode::AvatarFinite);
        }

        let world = &self.config.world;
        if self.avatar.y < world.avatar_radius
            || self.avatar.y > world.window_height - world.avatar_radius
        {
            return Err(RuleCode::AvatarBounds);
        }

        let charge = self.gauge.charge();
        if !charge.is_finite() || charge < 0.0 {
            return Err(RuleCode::GaugeCharge);
        }

        let mut last_x = f32::NEG_INFINITY;
        for obstacle in self.obstacles.obstacles() {
            if !obstacle.x.is_finite()
                || obstacle.width <= 0.0
                || obstacle.gap_height <= 0.0
                || obstacle.is_offscreen()
            {
                return Err(RuleCode::ObstacleGeometry);
            }
            if obstacle.x < last_x {
                return Err(RuleCode::ObstacleOrder);
            }
            last_x = obstacle.x;
        }

        if (self.score as usize) < self.obstacles.passed_count() {
            return Err(RuleCode::ScoreBelowPassed);
        }

        Ok(())
    }
}
