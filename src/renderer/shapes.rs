//! Geometry for scene entities
//!
//! The camera looks straight down -z with an orthographic projection, so each
//! box shows up as a rectangle of its width and height.

use glam::Vec2;

use super::vertex::Vertex;
use crate::color_to_rgba;
use crate::sim::{Camera, Entity, ViewportBounds};

/// Map a world-space point into normalized device coordinates
pub fn world_to_ndc(bounds: &ViewportBounds, point: Vec2) -> Vec2 {
    let width = bounds.width();
    let height = bounds.height();
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (point.x - bounds.left) / width * 2.0 - 1.0,
        (point.y - bounds.bottom) / height * 2.0 - 1.0,
    )
}

/// Two triangles covering an axis-aligned rectangle
pub fn quad(min: Vec2, max: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, max.y, color),
    ]
}

/// NDC quad for one entity's box
pub fn entity_quad(bounds: &ViewportBounds, entity: &Entity) -> [Vertex; 6] {
    let half = entity.size.truncate() / 2.0;
    let center = entity.position.truncate();
    quad(
        world_to_ndc(bounds, center - half),
        world_to_ndc(bounds, center + half),
        color_to_rgba(entity.color),
    )
}

/// Vertices for every entity in draw order
pub fn scene_vertices(camera: &Camera, entities: &[&Entity]) -> Vec<Vertex> {
    let bounds = camera.bounds();
    let mut vertices = Vec::with_capacity(entities.len() * 6);
    for entity in entities {
        vertices.extend_from_slice(&entity_quad(&bounds, entity));
    }
    vertices
}
