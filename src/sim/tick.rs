//! Per-frame simulation step
//!
//! One call per animation frame: move enemies, cull, detect collisions and
//! score them. The frame chain itself is tracked by `FrameLoop` so the owner
//! can stop requesting frames once the round is over.

use super::context::GameContext;
use super::enemies::EnemyManager;
use super::entity::Entity;
use super::round::RoundClock;

/// Cancellation handle for the animation-frame chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameLoop {
    active: bool,
    requested: u64,
}

impl FrameLoop {
    pub fn start(&mut self) {
        self.active = true;
    }

    /// Stop the chain; later frames become no-ops
    pub fn cancel(&mut self) {
        if self.active {
            log::debug!("Frame loop cancelled after {} frames", self.requested);
        }
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Ask for another frame; false once cancelled
    pub fn request_next(&mut self) -> bool {
        if self.active {
            self.requested += 1;
        }
        self.active
    }

    /// Frames requested since the loop was created
    pub fn requested(&self) -> u64 {
        self.requested
    }
}

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub collisions: u32,
    pub culled: u32,
    /// Points actually credited this frame
    pub scored: u64,
}

/// Advance enemies one step against the player and credit one point per catch
///
/// Does nothing unless the round is running.
pub fn tick(
    ctx: &mut GameContext,
    player: &Entity,
    enemies: &mut EnemyManager,
    round: &mut RoundClock,
) -> TickReport {
    if !round.is_running() {
        return TickReport::default();
    }
    let report = enemies.tick(ctx, player);
    let mut scored = 0;
    for _ in 0..report.collisions {
        if round.add_score(1) {
            scored += 1;
        }
    }
    TickReport {
        collisions: report.collisions,
        culled: report.culled,
        scored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScore;
    use crate::persistence::MemoryStore;
    use crate::sim::entity::EntityOptions;
    use glam::Vec3;

    fn setup() -> (GameContext, Entity, EnemyManager, RoundClock) {
        let mut ctx = GameContext::new(800, 800, 10.0);
        let player = Entity::player(ctx.next_entity_id(), &EntityOptions::default());
        let round = RoundClock::new(HighScore::new(Box::new(MemoryStore::new())), 5);
        (ctx, player, EnemyManager::default(), round)
    }

    #[test]
    fn test_frame_loop_cancel() {
        let mut frames = FrameLoop::default();
        assert!(!frames.request_next());
        frames.start();
        assert!(frames.request_next());
        assert!(frames.request_next());
        frames.cancel();
        assert!(!frames.request_next());
        assert_eq!(frames.requested(), 2);
    }

    #[test]
    fn test_collision_scores_one_point() {
        let (mut ctx, player, mut enemies, mut round) = setup();
        round.start();
        enemies.insert(&mut ctx, Vec3::new(0.2, 0.6, 0.0));
        enemies.insert(&mut ctx, Vec3::new(6.0, 6.0, 0.0));

        let report = tick(&mut ctx, &player, &mut enemies, &mut round);
        assert_eq!(report.collisions, 1);
        assert_eq!(report.scored, 1);
        assert_eq!(round.score(), 1);

        // The caught enemy is gone, so the next frame cannot count it again
        let report = tick(&mut ctx, &player, &mut enemies, &mut round);
        assert_eq!(report.collisions, 0);
        assert_eq!(round.score(), 1);
    }

    #[test]
    fn test_idle_round_does_not_tick() {
        let (mut ctx, player, mut enemies, mut round) = setup();
        enemies.insert(&mut ctx, Vec3::new(0.0, 0.5, 0.0));
        let report = tick(&mut ctx, &player, &mut enemies, &mut round);
        assert_eq!(report, TickReport::default());
        assert_eq!(enemies.enemies()[0].position.y, 0.5);
    }
}
