//! Shared game context: camera, render surface size, scene membership
//!
//! Built once by the driver and lent to every component. There is no global
//! instance; a restart builds a fresh `Game` around a fresh context.

use super::bounds::ViewportBounds;
use super::entity::EntityId;
use crate::consts::*;

/// Orthographic camera looking down -z at the play-field
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    bounds: ViewportBounds,
    scale: f32,
    pub z: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect_ratio: f32, scale: f32) -> Self {
        Self {
            bounds: ViewportBounds::from_aspect(aspect_ratio, scale),
            scale: scale.abs(),
            z: CAMERA_Z,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }

    pub fn bounds(&self) -> ViewportBounds {
        self.bounds
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Recompute the projection for a new aspect ratio, returning the old bounds
    pub fn update_bounds(&mut self, aspect_ratio: f32) -> ViewportBounds {
        let previous = self.bounds;
        self.bounds = ViewportBounds::from_aspect(aspect_ratio, self.scale);
        previous
    }
}

/// Ordered set of entities submitted to the renderer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    members: Vec<EntityId>,
}

impl Scene {
    /// Add an entity; adding twice keeps a single entry
    pub fn add(&mut self, id: EntityId) {
        if !self.members.contains(&id) {
            self.members.push(id);
        }
    }

    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.members.len();
        self.members.retain(|&m| m != id);
        self.members.len() != before
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.members.iter().copied()
    }
}

/// Camera, surface and scene shared by all components of one game
#[derive(Debug, Clone)]
pub struct GameContext {
    pub camera: Camera,
    pub scene: Scene,
    /// Render surface size in CSS pixels
    surface_size: (u32, u32),
    next_id: EntityId,
}

/// Surfaces with an empty side (canvas not laid out yet) are treated as square
fn aspect_of(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

impl GameContext {
    pub fn new(width: u32, height: u32, camera_scale: f32) -> Self {
        Self {
            camera: Camera::new(aspect_of(width, height), camera_scale),
            scene: Scene::default(),
            surface_size: (width, height),
            next_id: 1,
        }
    }

    pub fn bounds(&self) -> ViewportBounds {
        self.camera.bounds()
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Resize the surface and camera; returns the bounds before the resize
    pub fn resize(&mut self, width: u32, height: u32) -> ViewportBounds {
        self.surface_size = (width, height);
        self.camera.update_bounds(aspect_of(width, height))
    }
}
