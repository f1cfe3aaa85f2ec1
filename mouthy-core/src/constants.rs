//! Built-in defaults for the simulation.
//!
//! Nothing in the engine reads these directly at tick time: they seed
//! `GameConfig::default()`, which is what `RunState` consumes.

// World dimensions (px)
pub const WINDOW_WIDTH: f32 = 960.0;
pub const WINDOW_HEIGHT: f32 = 540.0;

// Avatar
pub const AVATAR_RADIUS: f32 = 25.0;
pub const AVATAR_X: f32 = 240.0; // WINDOW_WIDTH * 0.25

// Largest delta-time a single tick may integrate (s).
pub const DT_CLAMP: f32 = 1.0 / 30.0;

// Obstacles
pub const PIPE_WIDTH: f32 = 90.0;
pub const PIPE_GAP_MIN_Y: i32 = 140;
pub const PIPE_GAP_MAX_Y: i32 = 400; // WINDOW_HEIGHT - 140
pub const PIPE_SPAWN_MARGIN: f32 = 20.0;

// Lives
pub const STARTING_LIVES: u32 = 3;
pub const LIFE_MAX: u32 = 5;
pub const INVINCIBLE_SECS: f32 = 1.0;
pub const LIFE_GAUGE_UNIT: f32 = 1.0;
pub const LIFE_GAUGE_COOLDOWN_SECS: f32 = 0.0;

// Gesture thresholds
pub const EYE_CLOSE_THRESHOLD: f32 = 0.38;
pub const EYE_OPEN_THRESHOLD: f32 = 0.43;
pub const MOUTH_OPEN_THRESHOLD: f32 = 0.26;

// Below this horizontal span an aperture ratio is reported as 0.
pub const DEGENERATE_SPAN: f32 = 1e-6;

// Face-mesh model emits this many points per face.
pub const FACE_MESH_LANDMARKS: usize = 468;
