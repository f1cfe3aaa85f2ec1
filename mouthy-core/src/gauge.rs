use serde::{Deserialize, Serialize};

/// Regeneration meter charged while the eyes-closed gate is active.
///
/// Charge never decays and is never reset mid-run. Once lives are at the cap
/// it keeps growing without paying out.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LifeGauge {
    charge: f32,
    cooldown_until: f64,
    rate: f32,
    unit: f32,
    cooldown: f32,
    max_lives: u32,
}

impl LifeGauge {
    pub fn new(rate: f32, unit: f32, cooldown: f32, max_lives: u32) -> Self {
        debug_assert!(unit > 0.0);
        Self {
            charge: 0.0,
            cooldown_until: 0.0,
            rate,
            unit,
            cooldown,
            max_lives,
        }
    }

    pub fn charge(&self) -> f32 {
        self.charge
    }

    pub fn cooldown_until(&self) -> f64 {
        self.cooldown_until
    }

    pub fn is_cooling_down(&self, now: f64) -> bool {
        now < self.cooldown_until
    }

    /// Returns the number of lives earned this tick. `current_lives` plus the
    /// return value never exceeds the cap.
    pub fn update(&mut self, eyes_closed: bool, dt: f32, now: f64, current_lives: u32) -> u32 {
        if self.is_cooling_down(now) || !eyes_closed {
            return 0;
        }

        self.charge += self.rate * dt.max(0.0);

        let mut gained = 0;
        while self.charge >= self.unit && current_lives + gained < self.max_lives {
            self.charge -= self.unit;
            gained += 1;
            // A configured cooldown allows at most one payout per call.
            if self.cooldown > 0.0 {
                self.cooldown_until = now + f64::from(self.cooldown);
                break;
            }
        }

        gained
    }

    pub fn fill_ratio(&self) -> f32 {
        (self.charge / self.unit).clamp(0.0, 1.0)
    }
}
