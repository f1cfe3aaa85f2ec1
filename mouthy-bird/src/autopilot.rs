//! Synthetic faces that play the game headlessly. Each bot looks at the
//! render snapshot and answers with the gesture ratios a real face would
//! produce, so runs exercise the full gate -> sim path.

use mouthy_bird_core::rng::SeededRng;
use mouthy_bird_core::sim::RunSnapshot;
use mouthy_bird_core::GestureRatios;

const EAR_OPEN: f32 = 0.50;
const EAR_CLOSED: f32 = 0.22;
const MAR_OPEN: f32 = 0.45;
const MAR_CLOSED: f32 = 0.08;
// Ratio noise amplitude; small enough to stay outside the eye hysteresis band.
const JITTER: f32 = 0.03;

pub trait FaceBot: Send {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn reset(&mut self, seed: u32);
    /// `None` simulates a frame with no detected face.
    fn next_face(&mut self, world: &RunSnapshot) -> Option<GestureRatios>;
}

pub fn bot_ids() -> Vec<&'static str> {
    vec!["idle", "pilot", "healer", "flaky"]
}

pub fn describe_bots() -> Vec<(&'static str, &'static str)> {
    bot_ids()
        .into_iter()
        .filter_map(create_bot)
        .map(|bot| (bot.id(), bot.description()))
        .collect()
}

pub fn create_bot(id: &str) -> Option<Box<dyn FaceBot>> {
    match id {
        "idle" => Some(Box::new(IdleFace)),
        "pilot" => Some(Box::new(PilotFace::new(
            "pilot",
            "Steers toward the next gap with the mouth; eyes stay open.",
            false,
            0,
        ))),
        "healer" => Some(Box::new(PilotFace::new(
            "healer",
            "Pilot that keeps its eyes shut whenever a life is missing.",
            true,
            0,
        ))),
        "flaky" => Some(Box::new(PilotFace::new(
            "flaky",
            "Pilot whose face tracking drops roughly one frame in eight.",
            false,
            8,
        ))),
        _ => None,
    }
}

struct IdleFace;

impl FaceBot for IdleFace {
    fn id(&self) -> &'static str {
        "idle"
    }

    fn description(&self) -> &'static str {
        "Never opens its mouth; sinks to the floor."
    }

    fn reset(&mut self, _seed: u32) {}

    fn next_face(&mut self, _world: &RunSnapshot) -> Option<GestureRatios> {
        Some(GestureRatios {
            eye_aspect_ratio: EAR_OPEN,
            mouth_aspect_ratio: MAR_CLOSED,
        })
    }
}

struct PilotFace {
    id: &'static str,
    description: &'static str,
    heals: bool,
    /// Drop one frame in `dropout` (0 disables).
    dropout: u32,
    rng: SeededRng,
}

impl PilotFace {
    fn new(id: &'static str, description: &'static str, heals: bool, dropout: u32) -> Self {
        Self {
            id,
            description,
            heals,
            dropout,
            rng: SeededRng::new(1),
        }
    }

    fn jitter(&mut self) -> f32 {
        let unit = (self.rng.next() >> 8) as f32 / (1u32 << 24) as f32;
        (unit * 2.0 - 1.0) * JITTER
    }

    fn target_y(world: &RunSnapshot) -> f32 {
        world
            .next_obstacle()
            .map(|obstacle| obstacle.gap_center_y)
            .unwrap_or(270.0)
    }
}

impl FaceBot for PilotFace {
    fn id(&self) -> &'static str {
        self.id
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn reset(&mut self, seed: u32) {
        self.rng = SeededRng::new(seed ^ 0x5EED_F00D);
    }

    fn next_face(&mut self, world: &RunSnapshot) -> Option<GestureRatios> {
        if self.dropout > 0 && self.rng.next() % self.dropout == 0 {
            return None;
        }

        // Open the mouth when the body is predicted to sink below the gap centre.
        let predicted = world.avatar_y + world.avatar_vy * 0.12;
        let thrust = predicted > Self::target_y(world);
        let close_eyes = self.heals && world.lives < world.max_lives;

        let mouth = if thrust { MAR_OPEN } else { MAR_CLOSED };
        let eyes = if close_eyes { EAR_CLOSED } else { EAR_OPEN };
        Some(GestureRatios {
            eye_aspect_ratio: eyes + self.jitter(),
            mouth_aspect_ratio: mouth + self.jitter(),
        })
    }
}
