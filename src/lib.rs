//! Cube Catch - a timed arcade game about catching falling cubes
//!
//! Core modules:
//! - `sim`: Simulation core (bounds math, entities, spawning, round clock, frame tick)
//! - `game`: Aggregate that wires the simulation to its collaborators
//! - `renderer`: WebGPU rendering of the scene
//! - `platform`: Input translation (keyboard, multi-touch)
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `settings`: Data-driven game tuning
//! - `highscores`: Best-score persistence
//! - `ui`: Score/timer readouts pushed to the host

pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::GameError;
pub use game::Game;
pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Countdown length of a round
    pub const DEFAULT_TIME_LIMIT_SECS: i32 = 60;
    /// Cadence of the round countdown
    pub const COUNTDOWN_INTERVAL_MS: f64 = 1000.0;
    /// Cadence of enemy spawning
    pub const DEFAULT_SPAWN_INTERVAL_MS: f64 = 1000.0;

    /// Player base speed (world units per movement command)
    pub const DEFAULT_PLAYER_SPEED: f32 = 1.0;
    /// Enemy base speed (world units per frame, negative = downward)
    pub const DEFAULT_ENEMY_SPEED: f32 = -0.05;
    /// Relative enemy speed-up applied on every touch start
    pub const DEFAULT_ENEMY_SPEED_RAMP: f32 = 1.02;

    /// Half-height of the orthographic view in world units
    pub const DEFAULT_CAMERA_SCALE: f32 = 10.0;
    pub const CAMERA_Z: f32 = 5.0;
    pub const CAMERA_NEAR: f32 = 1.0;
    pub const CAMERA_FAR: f32 = 1000.0;

    /// Screen pixels per normalized touch step
    pub const TOUCH_NORMALIZE_FACTOR: f32 = 40.0;

    /// Default cube edge length
    pub const DEFAULT_BOX_SIZE: f32 = 1.0;
    pub const PLAYER_COLOR: u32 = 0x00ff00;
    pub const ENEMY_COLOR: u32 = 0xff0000;
}

/// Convert a packed `0xRRGGBB` colour into linear RGBA components
#[inline]
pub fn color_to_rgba(color: u32) -> [f32; 4] {
    let r = ((color >> 16) & 0xff) as f32 / 255.0;
    let g = ((color >> 8) & 0xff) as f32 / 255.0;
    let b = (color & 0xff) as f32 / 255.0;
    [r, g, b, 1.0]
}
