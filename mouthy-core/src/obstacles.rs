//! Gap obstacles ("pipes"): spawning, scrolling, retirement and hit-testing.

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub gap_center_y: f32,
    pub width: f32,
    pub gap_height: f32,
    /// Latched once the trailing edge clears the avatar; scores exactly once.
    pub passed: bool,
}

/// Axis-aligned rectangle, origin at the top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Obstacle {
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    pub fn is_offscreen(&self) -> bool {
        self.trailing_edge() < 0.0
    }

    pub fn gap_top(&self) -> f32 {
        self.gap_center_y - self.gap_height / 2.0
    }

    pub fn gap_bottom(&self) -> f32 {
        self.gap_center_y + self.gap_height / 2.0
    }

    /// Upper and lower solid parts.
    pub fn rects(&self, window_height: f32) -> [Rect; 2] {
        let bottom_y = self.gap_bottom();
        [
            Rect {
                x: self.x,
                y: 0.0,
                w: self.width,
                h: self.gap_top(),
            },
            Rect {
                x: self.x,
                y: bottom_y,
                w: self.width,
                h: window_height - bottom_y,
            },
        ]
    }

    pub fn collides_circle(&self, cx: f32, cy: f32, radius: f32, window_height: f32) -> bool {
        self.rects(window_height)
            .iter()
            .any(|rect| rect.h > 0.0 && circle_rect_collision(cx, cy, radius, rect))
    }
}

/// Nearest point on the rectangle to the circle centre, compared against the
/// radius. Touching counts as a hit.
pub fn circle_rect_collision(cx: f32, cy: f32, radius: f32, rect: &Rect) -> bool {
    let nearest_x = cx.clamp(rect.x, rect.x + rect.w);
    let nearest_y = cy.clamp(rect.y, rect.y + rect.h);
    let dx = cx - nearest_x;
    let dy = cy - nearest_y;
    dx * dx + dy * dy <= radius * radius
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreCheck {
    pub score_delta: u32,
    pub hit: bool,
}

/// Active obstacles in spawn order, leftmost first.
#[derive(Clone, Debug, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Appends an obstacle at `x` with its gap centre drawn uniformly from
    /// `[min_gap_center, max_gap_center]`.
    pub fn spawn<R: RandomSource + ?Sized>(
        &mut self,
        x: f32,
        min_gap_center: i32,
        max_gap_center: i32,
        width: f32,
        gap_height: f32,
        rng: &mut R,
    ) -> Obstacle {
        let gap_center_y = rng.range_inclusive(min_gap_center, max_gap_center) as f32;
        let obstacle = Obstacle {
            x,
            gap_center_y,
            width,
            gap_height,
            passed: false,
        };
        self.obstacles.push(obstacle);
        obstacle
    }

    /// Scrolls every obstacle left and retires the ones fully off-screen.
    /// Returns how many were retired.
    pub fn advance(&mut self, dt: f32, scroll_speed: f32) -> usize {
        let before = self.obstacles.len();
        for obstacle in &mut self.obstacles {
            obstacle.x -= scroll_speed * dt;
        }
        self.obstacles.retain(|obstacle| !obstacle.is_offscreen());
        before - self.obstacles.len()
    }

    pub fn check_score_and_collision(
        &mut self,
        avatar_x: f32,
        avatar_y: f32,
        avatar_radius: f32,
        window_height: f32,
    ) -> ScoreCheck {
        let mut check = ScoreCheck::default();
        for obstacle in &mut self.obstacles {
            if obstacle.collides_circle(avatar_x, avatar_y, avatar_radius, window_height) {
                check.hit = true;
            }
            if !obstacle.passed && obstacle.trailing_edge() < avatar_x {
                obstacle.passed = true;
                check.score_delta += 1;
            }
        }
        check
    }

    pub fn passed_count(&self) -> usize {
        self.obstacles.iter().filter(|entry| entry.passed).count()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }
}
