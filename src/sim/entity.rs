//! Moving box entities (player and enemies)

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Stable identity of an entity within one game
pub type EntityId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Overlap test; boxes that only touch count as intersecting
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// Construction options for an entity; unset fields take the kind's defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityOptions {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub depth: Option<f32>,
    /// Packed `0xRRGGBB`
    pub color: Option<u32>,
    pub position: Option<Vec3>,
    pub speed: Option<f32>,
}

/// A positioned, speed-bearing box
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec3,
    /// Box dimensions (width, height, depth)
    pub size: Vec3,
    pub color: u32,
    /// World units per movement step (player) or per frame (enemy)
    pub speed: f32,
}

impl Entity {
    fn from_options(
        id: EntityId,
        kind: EntityKind,
        options: &EntityOptions,
        color: u32,
        speed: f32,
    ) -> Self {
        Self {
            id,
            kind,
            position: options.position.unwrap_or(Vec3::ZERO),
            size: Vec3::new(
                options.width.unwrap_or(DEFAULT_BOX_SIZE),
                options.height.unwrap_or(DEFAULT_BOX_SIZE),
                options.depth.unwrap_or(DEFAULT_BOX_SIZE),
            ),
            color: options.color.unwrap_or(color),
            speed: options.speed.unwrap_or(speed),
        }
    }

    /// Green unit cube at the origin unless overridden
    pub fn player(id: EntityId, options: &EntityOptions) -> Self {
        Self::from_options(id, EntityKind::Player, options, PLAYER_COLOR, DEFAULT_PLAYER_SPEED)
    }

    /// Red unit cube falling at the default enemy speed unless overridden
    pub fn enemy(id: EntityId, position: Vec3, options: &EntityOptions) -> Self {
        let mut enemy =
            Self::from_options(id, EntityKind::Enemy, options, ENEMY_COLOR, DEFAULT_ENEMY_SPEED);
        enemy.position = position;
        enemy
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }

    /// Speed usable for movement: finite and non-zero
    pub fn has_speed(&self) -> bool {
        self.speed.is_finite() && self.speed != 0.0
    }
}
