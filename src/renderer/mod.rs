//! Scene rendering
//!
//! The game hands the camera and the visible entities to a `SceneRenderer`
//! once per frame. `RenderState` draws them with WebGPU; `FrameRecorder`
//! keeps the last submitted frame for headless runs.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;

use crate::error::GameError;
use crate::sim::{Camera, Entity, EntityId};

/// Draws the current scene
pub trait SceneRenderer {
    fn render(&mut self, camera: &Camera, entities: &[&Entity]) -> Result<(), GameError>;
}

/// Headless renderer that remembers what it was asked to draw
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    pub frames: u64,
    pub last_ids: Vec<EntityId>,
    pub last_vertex_count: usize,
}

impl SceneRenderer for FrameRecorder {
    fn render(&mut self, camera: &Camera, entities: &[&Entity]) -> Result<(), GameError> {
        self.frames += 1;
        self.last_ids = entities.iter().map(|e| e.id).collect();
        self.last_vertex_count = shapes::scene_vertices(camera, entities).len();
        Ok(())
    }
}
