use serde::{Deserialize, Serialize};

/// Vertical body the player steers. Screen y grows downward, so thrust is a
/// negative acceleration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvatarBody {
    pub y: f32,
    pub vy: f32,
}

impl AvatarBody {
    pub fn new(y: f32) -> Self {
        Self { y, vy: 0.0 }
    }

    /// Semi-implicit Euler step followed by an inelastic clamp to
    /// `[radius, window_height - radius]`. Returns true if the clamp fired.
    pub fn step(
        &mut self,
        dt: f32,
        thrust_active: bool,
        gravity: f32,
        thrust: f32,
        radius: f32,
        window_height: f32,
    ) -> bool {
        let ay = if thrust_active { -thrust } else { gravity };
        self.vy += ay * dt;
        self.y += self.vy * dt;

        let top = radius;
        let bottom = window_height - radius;
        if self.y < top {
            self.y = top;
            self.vy = 0.0;
            true
        } else if self.y > bottom {
            self.y = bottom;
            self.vy = 0.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f32 = 540.0;
    const R: f32 = 25.0;

    #[test]
    fn gravity_compounds_without_clamp() {
        let mut body = AvatarBody::new(270.0);
        let mut vys = Vec::new();
        let mut ys = Vec::new();
        for _ in 0..3 {
            assert!(!body.step(0.1, false, 500.0, 600.0, R, H));
            vys.push(body.vy);
            ys.push(body.y);
        }
        for (got, want) in vys.iter().zip([50.0, 100.0, 150.0]) {
            assert!((got - want).abs() < 1e-3, "vy {got} != {want}");
        }
        for (got, want) in ys.iter().zip([275.0, 285.0, 300.0]) {
            assert!((got - want).abs() < 1e-3, "y {got} != {want}");
        }
    }

    #[test]
    fn floor_clamp_zeroes_velocity() {
        let mut body = AvatarBody { y: 510.0, vy: 400.0 };
        assert!(body.step(1.0 / 30.0, false, 500.0, 600.0, R, H));
        assert_eq!(body.y, H - R);
        assert_eq!(body.vy, 0.0);
    }

    #[test]
    fn ceiling_clamp_zeroes_velocity() {
        let mut body = AvatarBody { y: 30.0, vy: -300.0 };
        assert!(body.step(1.0 / 30.0, true, 500.0, 600.0, R, H));
        assert_eq!(body.y, R);
        assert_eq!(body.vy, 0.0);
    }

    #[test]
    fn position_stays_in_bounds_for_any_input() {
        let mut body = AvatarBody::new(270.0);
        let dts = [0.0, 0.001, 1.0 / 60.0, 1.0 / 30.0, 0.5, 3.0];
        for round in 0..400 {
            let dt = dts[round % dts.len()];
            let thrust = (round / 7) % 2 == 0;
            body.step(dt, thrust, 500.0, 600.0, R, H);
            assert!(body.y >= R && body.y <= H - R, "round {round}: y={}", body.y);
        }
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut body = AvatarBody { y: 200.0, vy: 35.0 };
        body.step(0.0, true, 500.0, 600.0, R, H);
        assert_eq!(body, AvatarBody { y: 200.0, vy: 35.0 });
    }
}
