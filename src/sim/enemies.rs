//! Falling enemies: spawning, movement, culling and collision

use glam::Vec3;
use rand::Rng;

use super::bounds::{
    PartialVec3, SpawnArea, ViewportBounds, is_out_of_bounds, offset_position, random_position_in,
    remap_position,
};
use super::context::GameContext;
use super::entity::{Entity, EntityId, EntityOptions};
use super::timer::IntervalTimer;
use crate::consts::{DEFAULT_ENEMY_SPEED, DEFAULT_SPAWN_INTERVAL_MS};
use crate::error::GameError;

/// Outcome of one enemy pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnemyTickReport {
    /// Enemies removed because they overlapped the player
    pub collisions: u32,
    /// Enemies removed because they left the play-field
    pub culled: u32,
}

/// Owns the live enemies and the single spawn timer
///
/// All enemies share `base_speed`; changing it updates every live enemy.
#[derive(Debug, Clone)]
pub struct EnemyManager {
    enemies: Vec<Entity>,
    spawn_timer: Option<IntervalTimer>,
    base_speed: f32,
    options: EntityOptions,
}

impl Default for EnemyManager {
    fn default() -> Self {
        Self::new(EntityOptions::default())
    }
}

impl EnemyManager {
    pub fn new(options: EntityOptions) -> Self {
        Self {
            enemies: Vec::new(),
            spawn_timer: None,
            base_speed: options.speed.unwrap_or(DEFAULT_ENEMY_SPEED),
            options,
        }
    }

    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn is_spawning(&self) -> bool {
        self.spawn_timer.is_some()
    }

    /// Spawn one enemy on the top edge at a random horizontal position
    pub fn spawn<R: Rng>(
        &mut self,
        ctx: &mut GameContext,
        rng: &mut R,
    ) -> Result<EntityId, GameError> {
        let bounds = ctx.bounds();
        if !bounds.is_valid() {
            return Err(GameError::InvalidBounds(format!("{:?}", bounds)));
        }
        let position =
            random_position_in(&SpawnArea::from(bounds), PartialVec3::y(bounds.top), rng);
        Ok(self.insert(ctx, position))
    }

    /// Arm the spawn timer; a no-op while already spawning
    pub fn start_spawning(&mut self, interval_ms: f64) {
        if self.spawn_timer.is_some() {
            return;
        }
        let timer = IntervalTimer::new(interval_ms);
        log::debug!("Spawning enemies every {} ms", timer.interval_ms());
        self.spawn_timer = Some(timer);
    }

    pub fn start_spawning_default(&mut self) {
        self.start_spawning(DEFAULT_SPAWN_INTERVAL_MS);
    }

    pub fn stop_spawning(&mut self) {
        if self.spawn_timer.take().is_some() {
            log::debug!("Enemy spawning stopped");
        }
    }

    /// Drive the spawn timer; returns how many enemies were spawned
    ///
    /// A failed spawn is logged and skipped, the timer stays armed.
    pub fn advance_spawn_timer<R: Rng>(
        &mut self,
        ctx: &mut GameContext,
        rng: &mut R,
        elapsed_ms: f64,
    ) -> u32 {
        let fires = match self.spawn_timer.as_mut() {
            Some(timer) => timer.advance(elapsed_ms),
            None => return 0,
        };
        let mut spawned = 0;
        for _ in 0..fires {
            match self.spawn(ctx, rng) {
                Ok(_) => spawned += 1,
                Err(e) => log::warn!("Enemy spawn failed: {}", e),
            }
        }
        spawned
    }

    /// Move every enemy one step and drop those that left or hit the player
    ///
    /// `player` is the pre-tick player entity.
    pub fn tick(&mut self, ctx: &mut GameContext, player: &Entity) -> EnemyTickReport {
        let bounds = ctx.bounds();
        let player_box = player.bounding_box();
        let mut report = EnemyTickReport::default();
        let mut removed = Vec::new();

        self.enemies.retain_mut(|enemy| {
            enemy.position = offset_position(enemy.position, PartialVec3::y(enemy.speed));
            let hit = enemy.bounding_box().intersects(&player_box);
            let out = is_out_of_bounds(enemy.position, &bounds);
            if hit {
                report.collisions += 1;
            } else if out {
                report.culled += 1;
            }
            if hit || out {
                removed.push(enemy.id);
                return false;
            }
            true
        });

        for id in removed {
            ctx.scene.remove(id);
        }
        report
    }

    /// Scale the shared speed relative to its current value
    pub fn rescale_speed(&mut self, factor: f32) -> Result<(), GameError> {
        if !factor.is_finite() {
            return Err(GameError::InvalidSpeedFactor(factor));
        }
        self.apply_speed(self.base_speed * factor);
        Ok(())
    }

    pub fn reset_speed(&mut self) {
        self.apply_speed(self.options.speed.unwrap_or(DEFAULT_ENEMY_SPEED));
    }

    fn apply_speed(&mut self, speed: f32) {
        self.base_speed = speed;
        for enemy in &mut self.enemies {
            enemy.speed = speed;
        }
    }

    /// Remove every enemy and stop spawning
    pub fn clear(&mut self, ctx: &mut GameContext) {
        for enemy in self.enemies.drain(..) {
            ctx.scene.remove(enemy.id);
        }
        self.stop_spawning();
    }

    pub fn reposition_after_resize(&mut self, ctx: &GameContext, old_bounds: ViewportBounds) {
        let new_bounds = ctx.bounds();
        for enemy in &mut self.enemies {
            enemy.position = remap_position(&old_bounds, &new_bounds, enemy.position);
        }
    }

    /// Place an enemy at an exact position with the current shared speed
    pub fn insert(&mut self, ctx: &mut GameContext, position: Vec3) -> EntityId {
        let mut enemy = Entity::enemy(ctx.next_entity_id(), position, &self.options);
        enemy.speed = self.base_speed;
        let id = enemy.id;
        ctx.scene.add(id);
        self.enemies.push(enemy);
        id
    }
}
