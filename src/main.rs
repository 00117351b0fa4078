//! Cube Catch entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use cube_catch::persistence::LocalStore;
    use cube_catch::platform::{InputRouter, RawInput, TouchSample};
    use cube_catch::renderer::{FrameRecorder, RenderState};
    use cube_catch::sim::RoundEvent;
    use cube_catch::ui::Hud;
    use cube_catch::{Game, Settings};

    /// Readouts backed by DOM elements
    struct DomHud {
        document: Document,
    }

    impl DomHud {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_class(&self, id: &str, class: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", class);
            }
        }
    }

    impl Hud for DomHud {
        fn set_score_text(&mut self, text: &str) {
            self.set_text("score", text);
        }

        fn set_timer_text(&mut self, text: &str) {
            self.set_text("timer", text);
        }

        fn set_high_score_text(&mut self, text: &str) {
            self.set_text("high-score", text);
        }

        fn show_restart(&mut self) {
            self.set_class("restart-btn", "");
        }

        fn hide_restart(&mut self) {
            self.set_class("restart-btn", "hidden");
        }
    }

    /// Everything the browser callbacks share
    struct App {
        game: Game,
        render_state: Option<RenderState>,
        router: InputRouter,
        document: Document,
        last_time: f64,
        loop_running: bool,
    }

    impl App {
        fn build_game(document: &Document, width: u32, height: u32) -> Game {
            // Write back so a repaired or first-run record is visible in storage
            let settings = Settings::load(&LocalStore);
            settings.save(&mut LocalStore);
            let seed = js_sys::Date::now() as u64;
            let hud = DomHud {
                document: document.clone(),
            };
            Game::new(
                settings,
                Box::new(LocalStore),
                Box::new(hud),
                width,
                height,
                seed,
            )
        }

        /// Route one host event; any rejection ends the round
        fn dispatch(&mut self, event_name: &str, input: RawInput<'_>) {
            let commands = match self.router.route(event_name, input) {
                Ok(commands) => commands,
                Err(e) => {
                    self.game.abort(&e);
                    self.router.reset();
                    return;
                }
            };
            for command in commands {
                if let Err(e) = self.game.handle_input(command) {
                    self.game.abort(&e);
                    self.router.reset();
                    break;
                }
            }
        }

        /// Throw the old game away and start a fresh round
        fn restart(&mut self) {
            let (width, height) = self.game.context().surface_size();
            self.game = Self::build_game(&self.document, width, height);
            self.router = InputRouter::new(self.game.settings().touch_normalize_factor);
            self.last_time = 0.0;
            self.game.start_round();
            log::info!("Game restarted");
        }
    }

    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width, height)
    }

    fn changed_touches(event: &TouchEvent) -> Vec<TouchSample> {
        let list = event.changed_touches();
        (0..list.length())
            .filter_map(|i| list.get(i))
            .map(|touch| TouchSample {
                id: touch.identifier(),
                x: touch.client_x() as f32,
                y: touch.client_y() as f32,
            })
            .collect()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Cube Catch starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = canvas_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let game = App::build_game(&document, width, height);
        let router = InputRouter::new(game.settings().touch_normalize_factor);
        let app = Rc::new(RefCell::new(App {
            game,
            render_state: None,
            router,
            document: document.clone(),
            last_time: 0.0,
            loop_running: false,
        }));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::default(),
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::error!("{}", e),
                        }
                    }
                    Err(e) => log::error!("No graphics adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(&window, &canvas, app.clone());
        setup_resize_handler(&window, &canvas, app.clone());
        setup_restart_button(&document, app.clone());

        app.borrow_mut().game.start_round();
        start_loop(app);

        log::info!("Cube Catch running!");
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        app: Rc<RefCell<App>>,
    ) {
        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                app.borrow_mut()
                    .dispatch(&event.type_(), RawInput::Key(&key));
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch phases share one handler; the event type picks the phase
        for name in ["touchstart", "touchmove", "touchend"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let touches = changed_touches(&event);
                app.borrow_mut()
                    .dispatch(&event.type_(), RawInput::Touches(&touches));
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        app: Rc<RefCell<App>>,
    ) {
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = canvas_size(&window, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);

            let mut a = app.borrow_mut();
            a.game.resize(width, height);
            if let Some(render_state) = a.render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(document: &Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().restart();
                start_loop(app.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Kick off the frame chain unless one is already pending
    fn start_loop(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            if a.loop_running {
                return;
            }
            a.loop_running = true;
        }
        request_animation_frame(app);
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let next = {
            let mut a = app.borrow_mut();
            let elapsed = if a.last_time > 0.0 {
                time - a.last_time
            } else {
                0.0
            };
            a.last_time = time;

            let App {
                game,
                render_state,
                router,
                ..
            } = &mut *a;
            if let Some(RoundEvent::Ended { .. }) = game.advance_timers(elapsed) {
                // Input is detached; forget fingers still down
                router.reset();
            }
            let next = match render_state.as_mut() {
                Some(render_state) => game.frame(render_state),
                None => game.frame(&mut FrameRecorder::default()),
            };
            a.loop_running = next;
            next
        };

        if next {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cube Catch (native) starting...");
    log::info!("Native mode runs a headless round - use `trunk serve` for the web version");

    let score = headless_round();
    println!("Headless round finished with score {}", score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one round at 60 fps, steering toward the lowest enemy
#[cfg(not(target_arch = "wasm32"))]
fn headless_round() -> u64 {
    use std::cell::RefCell;
    use std::rc::Rc;

    use cube_catch::persistence::MemoryStore;
    use cube_catch::platform::{Direction, InputCommand};
    use cube_catch::renderer::FrameRecorder;
    use cube_catch::ui::RecordingHud;
    use cube_catch::{Game, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let store = MemoryStore::new();
    let settings = Settings::load(&store);
    let hud = Rc::new(RefCell::new(RecordingHud::default()));
    let mut game = Game::new(
        settings,
        Box::new(store),
        Box::new(hud.clone()),
        1280,
        720,
        42,
    );
    let mut renderer = FrameRecorder::default();

    game.start_round();
    loop {
        game.advance_timers(FRAME_MS);

        let target = game
            .enemies()
            .enemies()
            .iter()
            .min_by(|a, b| a.position.y.total_cmp(&b.position.y))
            .map(|enemy| enemy.position.x);
        if let Some(target_x) = target {
            let x = game.player().entity().position.x;
            let step = game.player().speed();
            let command = if target_x > x + step / 2.0 {
                Some(InputCommand::Step(Direction::Right))
            } else if target_x < x - step / 2.0 {
                Some(InputCommand::Step(Direction::Left))
            } else {
                None
            };
            if let Some(command) = command {
                if let Err(e) = game.handle_input(command) {
                    game.abort(&e);
                }
            }
        }

        if !game.frame(&mut renderer) {
            break;
        }
    }

    let hud = hud.borrow();
    log::info!(
        "{} | {} | {} | {} frames rendered",
        hud.score,
        hud.timer,
        hud.high_score,
        renderer.frames
    );
    game.round().score()
}
