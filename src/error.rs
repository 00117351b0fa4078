//! Crate-wide error type

/// Errors raised by the simulation core and its collaborators
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GameError {
    /// Movement was dispatched while the player has no usable speed
    #[error("player speed not set")]
    MissingSpeed,

    /// An input event outside the keyboard/touch routing table
    #[error("invalid input event: {0}")]
    UnknownInputEvent(String),

    /// Viewport bounds are degenerate or non-finite
    #[error("invalid viewport bounds: {0}")]
    InvalidBounds(String),

    /// Speed factors must be finite
    #[error("invalid speed factor: {0}")]
    InvalidSpeedFactor(f32),

    /// High scores must be finite non-negative integers
    #[error("invalid high score: {0}")]
    InvalidHighScore(f64),

    /// The storage backend refused a read or write
    #[error("storage error: {0}")]
    Storage(String),

    /// The render backend failed to set up or present a frame
    #[error("render error: {0}")]
    Render(String),
}
