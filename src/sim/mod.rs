//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - Time arrives as elapsed milliseconds from the host
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - Rendering, input and storage are reached through traits

pub mod bounds;
pub mod context;
pub mod enemies;
pub mod entity;
pub mod player;
pub mod round;
pub mod tick;
pub mod timer;

pub use bounds::{
    PartialVec3, SpawnArea, ViewportBounds, is_out_of_bounds, offset_position, random_position_in,
    remap_position,
};
pub use context::{Camera, GameContext, Scene};
pub use enemies::{EnemyManager, EnemyTickReport};
pub use entity::{Aabb, Entity, EntityId, EntityKind, EntityOptions};
pub use player::PlayerController;
pub use round::{RoundClock, RoundEvent, RoundPhase};
pub use tick::{FrameLoop, TickReport, tick};
pub use timer::IntervalTimer;
