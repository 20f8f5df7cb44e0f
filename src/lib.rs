//! Gemini Wings - a one-button arcade flyer
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (physics, obstacles, collisions, scoring)
//! - `renderer`: Frame description, tessellation and the WebGPU pipeline
//! - `scheduler`: Per-frame driver tying simulation and rendering to the phase
//! - `controller`: Phase/score bookkeeping and commentary round tokens
//! - `commentary`: Post-round flavour text with offline fallbacks
//! - `persistence`: Key/value storage backends (LocalStorage, file, memory)
//! - `tuning`: Validated, data-driven game parameters

pub mod commentary;
pub mod controller;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod sim;
pub mod tuning;

pub use controller::Controller;
pub use highscores::ScoreRecord;
pub use scheduler::FrameScheduler;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Logical play field size (1 unit = 1 pixel at 1:1 scale)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 711.0;

    /// Downward acceleration added to velocity every tick
    pub const GRAVITY: f32 = 0.25;
    /// Velocity a flap sets, regardless of current velocity
    pub const IMPULSE: f32 = -5.5;

    /// Obstacle defaults
    pub const OBSTACLE_SPEED: f32 = 3.0;
    pub const SPAWN_INTERVAL_TICKS: u64 = 100;
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const GAP_SIZE: f32 = 180.0;
    /// Shortest allowed top or bottom barrier
    pub const MIN_ARM_HEIGHT: f32 = 50.0;

    /// Bird defaults (fixed x, square body)
    pub const BIRD_X: f32 = 50.0;
    pub const BIRD_SIZE: f32 = 34.0;
    pub const BIRD_START_Y: f32 = 300.0;

    /// Max bird tilt either way (radians)
    pub const MAX_TILT: f32 = std::f32::consts::FRAC_PI_4;
    /// Tilt per unit of vertical velocity (radians)
    pub const TILT_PER_VELOCITY: f32 = 0.1;

    /// Decoration
    pub const GRID_SPACING: f32 = 40.0;
    pub const CAP_HEIGHT: f32 = 15.0;
    pub const CAP_OVERHANG: f32 = 2.0;
    pub const BIRD_CORNER_RADIUS: f32 = 8.0;

    /// Scores below this get roasted by the fallback commentary
    pub const ROAST_THRESHOLD: u32 = 5;
}
