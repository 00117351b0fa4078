//! Player movement and speed scaling

use super::bounds::{
    PartialVec3, ViewportBounds, is_out_of_bounds, offset_position, remap_position,
};
use super::context::GameContext;
use super::entity::{Entity, EntityOptions};
use crate::consts::DEFAULT_PLAYER_SPEED;

/// Owns the player entity
///
/// `base_speed` is the speed the user asked for; the entity carries the
/// effective speed after aspect-ratio scaling.
#[derive(Debug, Clone)]
pub struct PlayerController {
    entity: Entity,
    options: EntityOptions,
    base_speed: f32,
}

impl PlayerController {
    pub fn new(ctx: &mut GameContext, options: EntityOptions) -> Self {
        let entity = Entity::player(ctx.next_entity_id(), &options);
        let base_speed = entity.speed;
        let mut player = Self {
            entity,
            options,
            base_speed,
        };
        player.rescale_speed(ctx);
        player
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Effective speed after viewport scaling
    pub fn speed(&self) -> f32 {
        self.entity.speed
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn add_to_scene(&self, ctx: &mut GameContext) {
        ctx.scene.add(self.entity.id);
    }

    /// Offset the player, refusing moves that would leave the play-field
    ///
    /// Returns whether the player moved.
    pub fn move_by(&mut self, ctx: &GameContext, direction: PartialVec3) -> bool {
        let candidate = offset_position(self.entity.position, direction);
        if is_out_of_bounds(candidate, &ctx.bounds()) {
            log::debug!("Move rejected at {:?}", candidate);
            return false;
        }
        self.entity.position = candidate;
        true
    }

    /// Wide viewports need more world units per step for the same screen distance
    pub fn rescale_speed(&mut self, ctx: &GameContext) {
        let scaling_factor = ctx.bounds().aspect_ratio().max(1.0);
        self.entity.speed = self.base_speed * scaling_factor;
    }

    pub fn set_base_speed(&mut self, ctx: &GameContext, speed: f32) {
        self.base_speed = speed;
        self.rescale_speed(ctx);
    }

    pub fn reset_speed(&mut self, ctx: &GameContext) {
        self.set_base_speed(ctx, DEFAULT_PLAYER_SPEED);
    }

    /// Keep the player's relative spot after the viewport changed
    pub fn reposition_after_resize(&mut self, ctx: &GameContext, old_bounds: ViewportBounds) {
        self.entity.position = remap_position(&old_bounds, &ctx.bounds(), self.entity.position);
        self.rescale_speed(ctx);
    }

    /// Recreate the entity from its construction options
    pub fn reset(&mut self, ctx: &mut GameContext) {
        let in_scene = ctx.scene.remove(self.entity.id);
        self.entity = Entity::player(ctx.next_entity_id(), &self.options);
        self.base_speed = self.entity.speed;
        self.rescale_speed(ctx);
        if in_scene {
            self.add_to_scene(ctx);
        }
    }
}
