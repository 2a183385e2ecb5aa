//! Neon Fruit entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent};

    use neon_fruit::renderer::CanvasRenderer;
    use neon_fruit::sim::{GamePhase, GameState, PointerEvent, PointerKind, tick};
    use neon_fruit::{LevelTable, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        table: LevelTable,
        last_time: f64,
        /// Phase the DOM overlays currently show
        last_phase: Option<GamePhase>,
    }

    impl Game {
        /// Advance one frame
        fn update(&mut self, time: f64) {
            let dt_ms = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                0.0
            };
            self.last_time = time;
            tick(&mut self.state, dt_ms);
        }

        fn render(&mut self) {
            // Title and level select show the first level's backdrop
            let Some(level) = self
                .state
                .level_settings()
                .or_else(|| self.table.levels().next())
            else {
                return;
            };
            if let Err(e) = self
                .renderer
                .render(&self.state.view(), level, &self.state.settings)
            {
                log::error!("Render failed: {:?}", e);
            }
        }

        fn pointer(&mut self, x: f32, y: f32, kind: PointerKind) {
            let pos = Vec2::new(x, y);
            self.state.pointer(PointerEvent { pos, kind });
        }

        /// Show the overlay for the current phase
        fn update_overlays(&mut self) {
            let phase = self.state.phase;
            if self.last_phase == Some(phase) {
                return;
            }
            self.last_phase = Some(phase);

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let overlays = [
                ("title-screen", GamePhase::Title),
                ("level-select", GamePhase::LevelSelect),
                ("game-over", GamePhase::GameOver),
            ];
            for (id, shown_in) in overlays {
                if let Some(el) = document.get_element_by_id(id) {
                    let class = if phase == shown_in { "overlay" } else { "overlay hidden" };
                    let _ = el.set_attribute("class", class);
                }
            }
            if phase == GamePhase::GameOver {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
            }
        }
    }

    /// Level table from an optional `<script id="level-table">` JSON block
    fn load_level_table(document: &Document) -> LevelTable {
        let Some(json) = document
            .get_element_by_id("level-table")
            .and_then(|el| el.text_content())
        else {
            return LevelTable::default();
        };
        match LevelTable::from_json(&json) {
            Ok(table) => table,
            Err(e) => {
                log::error!("Bad level table, using built-in levels: {}", e);
                LevelTable::default()
            }
        }
    }

    fn fit_canvas(canvas: &HtmlCanvasElement) -> (f32, f32) {
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width as f32, height as f32)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Neon Fruit starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let (width, height) = fit_canvas(&canvas);

        let settings = Settings::from_query(&window.location().search()?);
        let table = load_level_table(&document);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(seed, settings, neon_fruit::sim::Bounds::new(width, height)),
            renderer: CanvasRenderer::new(&canvas, seed)?,
            table,
            last_time: 0.0,
            last_phase: None,
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());

        request_animation_frame(game);
        Ok(())
    }

    /// Position of the primary touch in canvas coordinates
    fn touch_pos(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<(f32, f32)> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some((
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        ))
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().pointer(
                    event.offset_x() as f32,
                    event.offset_y() as f32,
                    PointerKind::Move,
                );
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().pointer(
                    event.offset_x() as f32,
                    event.offset_y() as f32,
                    PointerKind::Press,
                );
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some((x, y)) = touch_pos(&canvas_clone, &event) {
                    game.borrow_mut().pointer(x, y, PointerKind::Move);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some((x, y)) = touch_pos(&canvas_clone, &event) {
                    game.borrow_mut().pointer(x, y, PointerKind::Press);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let (w, h) = fit_canvas(&canvas_clone);
                game.borrow_mut().state.resize(w, h);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let result = match event.key().as_str() {
                    "Enter" if g.state.phase == GamePhase::Title => g.state.start(),
                    "Escape" if g.state.phase != GamePhase::Title => g.state.back(),
                    _ => Ok(()),
                };
                if let Err(e) = result {
                    log::warn!("{}", e);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(document, "start-btn", move || {
                if let Err(e) = game.borrow_mut().state.start() {
                    log::warn!("{}", e);
                }
            });
        }

        let levels: Vec<u8> = game.borrow().table.levels().map(|l| l.level).collect();
        for level in levels {
            let game = game.clone();
            on_click(document, &format!("level-{}", level), move || {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                if let Err(e) = g.state.select_level(level, &g.table) {
                    log::warn!("{}", e);
                }
            });
        }

        for id in ["back-btn", "game-over-back-btn"] {
            let game = game.clone();
            on_click(document, id, move || {
                if let Err(e) = game.borrow_mut().state.back() {
                    log::warn!("{}", e);
                }
            });
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_overlays();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Fruit (native) starting...");
    log::info!("The game itself runs in the browser - build with `trunk serve` for the web version");

    if let Err(e) = autopilot() {
        log::error!("Autopilot failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run of every level: slices whatever has fallen a third of the way down
#[cfg(not(target_arch = "wasm32"))]
fn autopilot() -> Result<(), neon_fruit::GameError> {
    use neon_fruit::sim::{Bounds, GameState, PointerEvent, PointerKind, tick};
    use neon_fruit::{LevelTable, Settings};

    const FRAMES: u32 = 60 * 60;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    let table = LevelTable::default();
    let levels: Vec<u8> = table.levels().map(|l| l.level).collect();
    let mut state = GameState::new(0x5eed, Settings::default(), Bounds::new(800.0, 600.0));

    for level in levels {
        state.start()?;
        state.select_level(level, &table)?;
        let mut slices = 0u32;
        for _ in 0..FRAMES {
            tick(&mut state, FRAME_MS);
            let target = state
                .fruits
                .iter()
                .find(|f| f.pos.y > state.bounds.height / 3.0)
                .map(|f| f.pos);
            if let Some(pos) = target {
                let event = PointerEvent {
                    pos,
                    kind: PointerKind::Move,
                };
                if state.pointer(event).is_some() {
                    slices += 1;
                }
            }
        }
        log::info!(
            "Level {}: {} slices, score {}, misses {}, phase {:?}",
            level,
            slices,
            state.score,
            state.misses,
            state.phase
        );
        state.back()?;
    }
    Ok(())
}
