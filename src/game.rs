//! Game aggregate
//!
//! Owns one context and every component built on it, and reacts to round
//! transitions: starting a round arms spawning, the frame loop and input;
//! ending it tears all three down in the same call.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::GameError;
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::platform::InputCommand;
use crate::renderer::SceneRenderer;
use crate::settings::Settings;
use crate::sim::{
    EnemyManager, Entity, FrameLoop, GameContext, PartialVec3, PlayerController, RoundClock,
    RoundEvent, tick,
};
use crate::ui::{self, Hud};

pub struct Game {
    settings: Settings,
    ctx: GameContext,
    player: PlayerController,
    enemies: EnemyManager,
    round: RoundClock,
    rng: Pcg32,
    frames: FrameLoop,
    hud: Box<dyn Hud>,
    input_attached: bool,
    /// One more render owed after the loop stopped (scene changed at round end)
    needs_redraw: bool,
}

impl Game {
    pub fn new(
        settings: Settings,
        store: Box<dyn KeyValueStore>,
        hud: Box<dyn Hud>,
        width: u32,
        height: u32,
        seed: u64,
    ) -> Self {
        let settings = settings.sanitized();
        let mut ctx = GameContext::new(width, height, settings.camera_scale);
        let player = PlayerController::new(&mut ctx, settings.player_options());
        player.add_to_scene(&mut ctx);
        let enemies = EnemyManager::new(settings.enemy_options());
        let round = RoundClock::new(HighScore::new(store), settings.time_limit_secs);

        let mut game = Self {
            settings,
            ctx,
            player,
            enemies,
            round,
            rng: Pcg32::seed_from_u64(seed),
            frames: FrameLoop::default(),
            hud,
            input_attached: false,
            needs_redraw: false,
        };
        game.refresh_readouts();
        let high_score = game.round.high_score();
        game.hud.set_high_score_text(&ui::high_score_text(high_score));
        log::info!("Game created ({}x{}, seed {})", width, height, seed);
        game
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn enemies(&self) -> &EnemyManager {
        &self.enemies
    }

    pub fn round(&self) -> &RoundClock {
        &self.round
    }

    pub fn frames(&self) -> &FrameLoop {
        &self.frames
    }

    pub fn is_input_attached(&self) -> bool {
        self.input_attached
    }

    /// Start (or restart) a round with the configured time limit
    ///
    /// Replaying after a finished round puts the player back at its spawn spot.
    pub fn start_round(&mut self) -> RoundEvent {
        if self.round.is_over() {
            self.player.reset(&mut self.ctx);
        }
        let event = self.round.start();
        self.on_round_event(&event);
        event
    }

    /// Feed wall-clock time to the countdown and spawn cadences
    ///
    /// The countdown runs first so a round that ends in this slice spawns nothing.
    pub fn advance_timers(&mut self, elapsed_ms: f64) -> Option<RoundEvent> {
        let event = self.round.advance(elapsed_ms);
        if let Some(event) = &event {
            self.on_round_event(event);
        }
        let spawned = self
            .enemies
            .advance_spawn_timer(&mut self.ctx, &mut self.rng, elapsed_ms);
        if spawned > 0 {
            log::debug!("Spawned {} enemies ({} alive)", spawned, self.enemies.len());
        }
        event
    }

    /// Run one animation frame; returns whether another frame was requested
    ///
    /// Once the loop is cancelled the first call still draws the cleared
    /// scene, without simulating or requesting another frame.
    pub fn frame(&mut self, renderer: &mut dyn SceneRenderer) -> bool {
        if !self.frames.is_active() {
            if self.needs_redraw {
                self.needs_redraw = false;
                self.draw(renderer);
            }
            return false;
        }

        let report = tick(
            &mut self.ctx,
            self.player.entity(),
            &mut self.enemies,
            &mut self.round,
        );
        if report.scored > 0 {
            log::debug!("Caught {} (score {})", report.scored, self.round.score());
        }
        self.hud.set_score_text(&ui::score_text(self.round.score()));
        self.hud
            .set_timer_text(&ui::timer_text(self.round.remaining_secs()));

        let next = self.frames.request_next();
        self.draw(renderer);
        next
    }

    fn draw(&self, renderer: &mut dyn SceneRenderer) {
        let visible = self.visible_entities();
        if let Err(e) = renderer.render(&self.ctx.camera, &visible) {
            log::error!("Render failed: {}", e);
        }
    }

    /// Apply one resolved input command; ignored while input is detached
    ///
    /// Returns whether the player moved. A player without a usable speed is a
    /// precondition failure; the caller should end the round with `abort`.
    pub fn handle_input(&mut self, command: InputCommand) -> Result<bool, GameError> {
        if !self.input_attached {
            return Ok(false);
        }
        match command {
            InputCommand::TouchBegan => {
                self.enemies.rescale_speed(self.settings.enemy_speed_ramp)?;
                Ok(false)
            }
            InputCommand::Step(direction) => {
                let speed = self.require_speed()?;
                Ok(self.player.move_by(&self.ctx, direction.offset(speed)))
            }
            InputCommand::Drag { dx, dy } => {
                let speed = self.require_speed()?;
                Ok(self
                    .player
                    .move_by(&self.ctx, PartialVec3::xy(dx * speed, -dy * speed)))
            }
        }
    }

    fn require_speed(&self) -> Result<f32, GameError> {
        let player = self.player.entity();
        if player.has_speed() {
            Ok(player.speed)
        } else {
            Err(GameError::MissingSpeed)
        }
    }

    /// End a running round because of an internal failure
    pub fn abort(&mut self, error: &GameError) -> Option<RoundEvent> {
        log::error!("Ending round: {}", error);
        let event = self.round.abort();
        if let Some(event) = &event {
            self.on_round_event(event);
        }
        event
    }

    /// Follow a render surface size change
    pub fn resize(&mut self, width: u32, height: u32) {
        let old_bounds = self.ctx.resize(width, height);
        self.player.reposition_after_resize(&self.ctx, old_bounds);
        self.enemies.reposition_after_resize(&self.ctx, old_bounds);
        log::debug!("Resized to {}x{}: {:?}", width, height, self.ctx.bounds());
    }

    /// Scene members in draw order
    pub fn visible_entities(&self) -> Vec<&Entity> {
        std::iter::once(self.player.entity())
            .chain(self.enemies.enemies().iter())
            .filter(|entity| self.ctx.scene.contains(entity.id))
            .collect()
    }

    fn on_round_event(&mut self, event: &RoundEvent) {
        match *event {
            RoundEvent::Started { high_score, .. } => {
                self.player.add_to_scene(&mut self.ctx);
                self.enemies.start_spawning(self.settings.spawn_interval_ms);
                self.frames.start();
                self.needs_redraw = false;
                self.input_attached = true;
                self.hud.set_high_score_text(&ui::high_score_text(high_score));
                self.hud.hide_restart();
                self.refresh_readouts();
            }
            RoundEvent::Ended { high_score, .. } => {
                self.frames.cancel();
                self.enemies.clear(&mut self.ctx);
                self.needs_redraw = true;
                self.input_attached = false;
                self.hud.set_high_score_text(&ui::high_score_text(high_score));
                self.refresh_readouts();
                self.hud.show_restart();
            }
        }
    }

    fn refresh_readouts(&mut self) {
        self.hud.set_score_text(&ui::score_text(self.round.score()));
        self.hud
            .set_timer_text(&ui::timer_text(self.round.remaining_secs()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HIGH_SCORE_KEY;
    use crate::persistence::MemoryStore;
    use crate::platform::Direction;
    use crate::renderer::FrameRecorder;
    use crate::sim::RoundPhase;
    use crate::ui::RecordingHud;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn game_with(
        settings: Settings,
        store: &MemoryStore,
    ) -> (Game, Rc<RefCell<RecordingHud>>) {
        let hud = Rc::new(RefCell::new(RecordingHud::default()));
        let game = Game::new(
            settings,
            Box::new(store.clone()),
            Box::new(hud.clone()),
            800,
            800,
            7,
        );
        (game, hud)
    }

    fn short_round() -> Settings {
        Settings {
            time_limit_secs: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_game_shows_readouts() {
        let store = MemoryStore::with_entry(HIGH_SCORE_KEY, "4");
        let (game, hud) = game_with(Settings::default(), &store);
        assert_eq!(game.round().phase(), RoundPhase::Idle);
        assert_eq!(hud.borrow().score, "Score: 0");
        assert_eq!(hud.borrow().timer, "Time: 60s");
        assert_eq!(hud.borrow().high_score, "High Score: 4");
        assert!(!game.frames().is_active());
        assert!(!game.is_input_attached());
    }

    #[test]
    fn test_start_round_wires_everything() {
        let store = MemoryStore::with_entry(HIGH_SCORE_KEY, "4");
        let (mut game, hud) = game_with(short_round(), &store);
        game.start_round();

        assert!(game.round().is_running());
        assert!(game.enemies().is_spawning());
        assert!(game.frames().is_active());
        assert!(game.is_input_attached());
        assert_eq!(hud.borrow().high_score, "High Score: 4");
        assert_eq!(hud.borrow().timer, "Time: 5s");
        assert!(!hud.borrow().restart_visible);
    }

    #[test]
    fn test_round_ends_exactly_once() {
        let store = MemoryStore::new();
        let (mut game, hud) = game_with(short_round(), &store);
        game.start_round();

        let mut ended = 0;
        for _ in 0..10 {
            if let Some(RoundEvent::Ended { .. }) = game.advance_timers(1000.0) {
                ended += 1;
            }
        }
        assert_eq!(ended, 1);
        assert!(game.round().is_over());
        assert!(game.round().remaining_secs() <= 0);
        assert!(game.enemies().is_empty());
        assert!(!game.enemies().is_spawning());
        assert!(!game.frames().is_active());
        assert!(!game.is_input_attached());
        assert!(hud.borrow().restart_visible);
        assert_eq!(hud.borrow().timer, "Time: 0s");
    }

    #[test]
    fn test_one_spawn_per_interval_while_running() {
        let store = MemoryStore::new();
        let (mut game, _hud) = game_with(short_round(), &store);
        game.start_round();
        // Starting again must not arm a second spawn timer
        game.enemies.start_spawning(game.settings.spawn_interval_ms);

        for _ in 0..3 {
            game.advance_timers(1000.0);
        }
        assert_eq!(game.enemies().len(), 3);
        let top = game.context().bounds().top;
        assert!(game.enemies().enemies().iter().all(|e| e.position.y == top));
    }

    #[test]
    fn test_collision_scores_in_frame() {
        let store = MemoryStore::new();
        let (mut game, hud) = game_with(short_round(), &store);
        game.start_round();
        game.enemies.insert(&mut game.ctx, Vec3::new(0.0, 1.0, 0.0));

        let mut renderer = FrameRecorder::default();
        assert!(game.frame(&mut renderer));
        assert_eq!(game.round().score(), 1);
        assert!(game.enemies().is_empty());
        assert_eq!(hud.borrow().score, "Score: 1");
        assert_eq!(renderer.frames, 1);
        assert_eq!(renderer.last_ids, vec![game.player().entity().id]);
    }

    #[test]
    fn test_no_mutation_after_round_over() {
        let store = MemoryStore::new();
        let (mut game, _hud) = game_with(short_round(), &store);
        game.start_round();
        for _ in 0..5 {
            game.advance_timers(1000.0);
        }
        assert!(game.round().is_over());
        let score = game.round().score();
        let position = game.player().entity().position;

        let mut renderer = FrameRecorder::default();
        assert!(!game.frame(&mut renderer));
        assert!(!game.frame(&mut renderer));
        assert_eq!(renderer.frames, 1);
        assert_eq!(game.handle_input(InputCommand::Step(Direction::Up)), Ok(false));
        assert_eq!(game.player().entity().position, position);
        game.advance_timers(5000.0);
        assert_eq!(game.round().score(), score);
        assert!(game.enemies().is_empty());
    }

    #[test]
    fn test_final_frame_shows_cleared_scene() {
        let store = MemoryStore::new();
        let (mut game, _hud) = game_with(short_round(), &store);
        game.start_round();
        let player_id = game.player().entity().id;
        game.enemies.insert(&mut game.ctx, Vec3::new(0.0, 8.0, 0.0));

        let mut renderer = FrameRecorder::default();
        assert!(game.frame(&mut renderer));
        assert_eq!(renderer.last_ids.len(), 2);

        game.advance_timers(5000.0);
        assert!(game.round().is_over());
        assert!(!game.frame(&mut renderer));
        assert_eq!(renderer.frames, 2);
        assert_eq!(renderer.last_ids, vec![player_id]);
        assert!(!game.frames().is_active());

        // Only one redraw is owed
        assert!(!game.frame(&mut renderer));
        assert_eq!(renderer.frames, 2);
    }

    #[test]
    fn test_replay_resets_player() {
        let store = MemoryStore::new();
        let (mut game, _hud) = game_with(short_round(), &store);
        game.start_round();
        game.handle_input(InputCommand::Step(Direction::Left)).unwrap();
        game.advance_timers(5000.0);

        game.start_round();
        assert_eq!(game.player().entity().position, Vec3::ZERO);
        assert!(game.context().scene.contains(game.player().entity().id));
        assert_eq!(game.visible_entities().len(), 1);
    }

    #[test]
    fn test_degenerate_settings_and_surface_still_playable() {
        let store = MemoryStore::new();
        let settings = Settings {
            camera_scale: 0.0,
            spawn_interval_ms: f64::NAN,
            ..short_round()
        };
        let hud = Rc::new(RefCell::new(RecordingHud::default()));
        let mut game = Game::new(settings, Box::new(store), Box::new(hud), 0, 600, 1);
        assert!(game.context().bounds().is_valid());

        game.start_round();
        assert_eq!(game.handle_input(InputCommand::Step(Direction::Up)), Ok(true));
        for _ in 0..3 {
            game.advance_timers(1000.0);
        }
        assert_eq!(game.enemies().len(), 3);
    }

    #[test]
    fn test_high_score_keeps_maximum() {
        let store = MemoryStore::with_entry(HIGH_SCORE_KEY, "3");
        let (mut game, hud) = game_with(short_round(), &store);
        let mut renderer = FrameRecorder::default();

        game.start_round();
        game.enemies.insert(&mut game.ctx, Vec3::new(0.0, 0.5, 0.0));
        game.frame(&mut renderer);
        game.advance_timers(5000.0);
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("3"));

        game.start_round();
        for _ in 0..5 {
            game.enemies.insert(&mut game.ctx, Vec3::new(0.0, 0.5, 0.0));
        }
        game.frame(&mut renderer);
        assert_eq!(game.round().score(), 5);
        game.advance_timers(5000.0);
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("5"));
        assert_eq!(hud.borrow().high_score, "High Score: 5");
    }

    #[test]
    fn test_keyboard_and_touch_movement() {
        let store = MemoryStore::new();
        let (mut game, _hud) = game_with(short_round(), &store);
        assert_eq!(game.handle_input(InputCommand::Step(Direction::Right)), Ok(false));

        game.start_round();
        assert_eq!(game.handle_input(InputCommand::Step(Direction::Right)), Ok(true));
        assert_eq!(game.player().entity().position, Vec3::new(1.0, 0.0, 0.0));

        // Screen y grows downward, world y grows upward
        assert_eq!(game.handle_input(InputCommand::Drag { dx: 0.0, dy: 2.0 }), Ok(true));
        assert_eq!(game.player().entity().position, Vec3::new(1.0, -2.0, 0.0));
    }

    #[test]
    fn test_missing_speed_aborts_round() {
        let store = MemoryStore::new();
        let mut settings = short_round();
        settings.player.speed = Some(0.0);
        let (mut game, hud) = game_with(settings, &store);
        game.start_round();

        let err = game
            .handle_input(InputCommand::Step(Direction::Up))
            .unwrap_err();
        assert_eq!(err, GameError::MissingSpeed);
        assert!(matches!(game.abort(&err), Some(RoundEvent::Ended { .. })));
        assert!(game.round().is_over());
        assert!(!game.frames().is_active());
        assert!(hud.borrow().restart_visible);
    }

    #[test]
    fn test_touch_start_ramps_enemy_speed() {
        let store = MemoryStore::new();
        let settings = Settings {
            enemy_speed: -0.5,
            enemy_speed_ramp: 2.0,
            ..short_round()
        };
        let (mut game, _hud) = game_with(settings, &store);
        game.start_round();
        game.handle_input(InputCommand::TouchBegan).unwrap();
        assert_eq!(game.enemies().base_speed(), -1.0);
    }

    #[test]
    fn test_resize_remaps_player() {
        let store = MemoryStore::new();
        let (mut game, _hud) = game_with(short_round(), &store);
        game.start_round();
        game.player.move_by(&game.ctx, PartialVec3::x(5.0));

        // Square 20x20 field becomes 40x20
        game.resize(1600, 800);
        let position = game.player().entity().position;
        assert!((position.x - 10.0).abs() < 1e-4);
        assert_eq!(position.y, 0.0);
        assert_eq!(game.player().speed(), 2.0);
    }
}
