//! Revenue Road entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, MouseEvent, TouchEvent};

    use revenue_road::audio::{AudioManager, SoundEffect};
    use revenue_road::renderer::{AssetId, CanvasBackend, ImageAssets};
    use revenue_road::sim::{GameEvent, GamePhase, Session};
    use revenue_road::ui::{self, HudSnapshot, ModalAction, ModalSpec};
    use revenue_road::{FrameDriver, Settings, ThemeCatalog, Tuning};

    /// Game instance holding all state
    struct Game {
        driver: FrameDriver,
        images: ImageAssets,
        backend: CanvasBackend,
        audio: AudioManager,
        themes: ThemeCatalog,
        settings: Settings,
        /// Modal currently shown, so buttons know what they do
        modal: Option<ModalSpec>,
    }

    impl Game {
        /// Start a run for the picked business
        fn start(&mut self, theme_id: &str) {
            let Some(theme) = self.themes.get(theme_id).cloned() else {
                log::warn!("Unknown business: {}", theme_id);
                return;
            };
            self.images.load(AssetId::Character, &theme.character.src);
            // First user gesture: the audio context may now run
            self.audio.resume();
            self.driver.session_mut().start(theme);
            self.handle_events();
        }

        /// Run one animation callback
        fn update(&mut self, now: f64) {
            self.images.poll();
            if !self.driver.frame(now, &self.images) {
                return;
            }
            let viewport = *self.driver.session().viewport();
            self.backend
                .render(self.driver.draw_list(), &self.images, &viewport);
            self.handle_events();
            self.update_hud();
        }

        /// Route simulation events to audio and the log
        fn handle_events(&mut self) {
            for event in self.driver.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
                match event {
                    GameEvent::SessionStarted { .. } => self.audio.start_music(),
                    GameEvent::GameEnded(outcome) => {
                        self.audio.stop_music();
                        log::info!("Run ended: {:?}", outcome);
                    }
                    GameEvent::ReturnedToMenu => self.audio.stop_music(),
                    _ => {}
                }
            }
        }

        fn on_modal_button(&mut self, index: usize) {
            let Some(action) = self
                .modal
                .as_ref()
                .and_then(|m| m.buttons.get(index))
                .map(|b| b.action)
            else {
                return;
            };
            let session = self.driver.session_mut();
            match action {
                ModalAction::Choose(option) => {
                    if let Some(effect) = session.choose(option) {
                        log::info!("Decision applied: {:?}", effect);
                    }
                }
                ModalAction::Restart => session.restart(),
                ModalAction::ChooseBusiness => session.return_to_menu(),
            }
            self.handle_events();
            self.update_hud();
        }

        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let width = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(800.0);
            let height = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(600.0);
            canvas.set_width(width as u32);
            canvas.set_height(height as u32);
            self.driver.resize(width as f32, height as f32);
            // Resizing resets context state
            self.backend.configure();
        }

        /// Update HUD elements and screens in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let session = self.driver.session();
            let in_menu = session.state().phase == GamePhase::Menu;

            set_visible(&document, "business-selection", in_menu);
            set_visible(&document, "canvas", !in_menu);
            set_visible(&document, "hud", !in_menu);
            set_visible(&document, "back-btn", !in_menu);
            set_visible(&document, "pause-menu", session.state().is_paused());

            let fps = self.settings.show_fps.then(|| self.driver.fps());
            let hud = HudSnapshot::from_session(session, fps);
            set_text(&document, "#hud-business", &hud.business);
            set_text(&document, "#hud-cash .hud-value", &hud.cash);
            set_text(&document, "#hud-month .hud-value", &hud.month);
            set_text(&document, "#hud-revenue .hud-value", &hud.revenue);
            set_text(&document, "#hud-cards", &hud.card_progress);
            if let Some(el) = document.get_element_by_id("hud-status") {
                el.set_text_content(Some(&hud.status));
                let _ = el.set_attribute("style", &format!("color: {}", hud.status_color));
            }
            set_visible(&document, "hud-fps", hud.fps.is_some());
            if let Some(fps) = &hud.fps {
                set_text(&document, "#hud-fps .hud-value", fps);
            }

            // Rebuild the popup only when its content changes
            let modal = ModalSpec::for_state(session.state());
            if modal != self.modal {
                show_modal(&document, modal.as_ref());
                self.modal = modal;
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn show_modal(document: &Document, modal: Option<&ModalSpec>) {
        let Some(modal) = modal else {
            set_visible(document, "card-popup", false);
            return;
        };
        if let Some(el) = document.get_element_by_id("popup-title") {
            el.set_text_content(Some(&modal.title));
            let style = modal
                .title_color
                .map(|c| format!("color: {}", c))
                .unwrap_or_default();
            let _ = el.set_attribute("style", &style);
        }
        if let Some(el) = document.get_element_by_id("popup-body") {
            el.set_inner_html(&ui::lines_html(&modal.lines));
        }
        for index in 0..2 {
            let Some(btn) = document.get_element_by_id(&format!("popup-btn-{}", index)) else {
                continue;
            };
            match modal.buttons.get(index) {
                Some(button) => {
                    btn.set_text_content(Some(&button.label));
                    let _ = btn.set_attribute("style", &format!("background: {}", button.color));
                    let _ = btn.set_attribute("class", "popup-btn");
                }
                None => {
                    let _ = btn.set_attribute("class", "popup-btn hidden");
                }
            }
        }
        set_visible(document, "card-popup", true);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Revenue Road starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let themes = match ThemeCatalog::builtin() {
            Ok(themes) => themes,
            Err(e) => {
                log::error!("Failed to parse business themes: {}", e);
                return;
            }
        };

        let query = window.location().search().unwrap_or_default();
        let user_agent = window.navigator().user_agent().unwrap_or_default();
        let settings = Settings::from_query(&query, &user_agent);
        log::info!("Quality preset: {}", settings.quality.as_str());

        let Some(backend) = CanvasBackend::new(&canvas) else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(seed, Tuning::default(), &settings);
        let game = Rc::new(RefCell::new(Game {
            driver: FrameDriver::new(session, &settings),
            images: ImageAssets::load_fixed(),
            backend,
            audio: AudioManager::new(settings.audio),
            themes,
            settings,
            modal: None,
        }));
        game.borrow_mut().resize(&canvas);

        log::info!("Game initialized with seed: {}", seed);

        render_business_grid(&document, &game.borrow().themes);

        // Set up input handlers
        setup_input_handlers(&canvas, game.clone());

        // Set up business picker and back button
        setup_menu(game.clone());

        // Set up popup, pause menu and audio buttons
        setup_buttons(game.clone());

        // Set up auto-pause on visibility change
        setup_auto_pause(game.clone());

        game.borrow_mut().update_hud();

        // Start game loop
        request_animation_frame(game);

        log::info!("Revenue Road running!");
    }

    fn render_business_grid(document: &Document, themes: &ThemeCatalog) {
        if let Some(grid) = document.get_element_by_id("business-grid") {
            let html: String = themes.iter().map(ui::business_card_html).collect();
            grid.set_inner_html(&html);
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click - tap at the press position
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .driver
                    .queue_tap(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (double tap pauses)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    game.borrow_mut()
                        .driver
                        .queue_touch(x, y, js_sys::Date::now());
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "Escape" | "p" | "P" => g.driver.queue_pause_toggle(),
                    // Debug spawns
                    "m" | "M" => g.driver.queue_test_money(),
                    "l" | "L" => g.driver.queue_money_line(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window resize
        {
            let canvas_clone = canvas.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize(&canvas_clone);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().update(time);
        request_animation_frame(game);
    }

    fn setup_menu(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // One listener for the whole grid; the card carries its theme id
        if let Some(grid) = document.get_element_by_id("business-grid") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let theme_id = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest("[data-theme]").ok().flatten())
                    .and_then(|el| el.get_attribute("data-theme"));
                if let Some(id) = theme_id {
                    let mut g = game.borrow_mut();
                    g.start(&id);
                    g.update_hud();
                }
            });
            let _ = grid.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("back-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.driver.session_mut().return_to_menu();
                g.handle_events();
                g.update_hud();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Popup buttons
        for index in 0..2 {
            if let Some(btn) = document.get_element_by_id(&format!("popup-btn-{}", index)) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().on_modal_button(index);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Resume button
        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().driver.queue_pause_toggle();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let audio = *game.borrow().audio.settings();

        // Sound toggle
        if let Some(btn) = document.get_element_by_id("sound-toggle") {
            btn.set_text_content(Some(sound_label(audio.sound_enabled)));
            let game = game.clone();
            let btn_clone = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let on = game.borrow_mut().audio.toggle_sound();
                btn_clone.set_text_content(Some(sound_label(on)));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Music toggle
        if let Some(btn) = document.get_element_by_id("music-toggle") {
            btn.set_text_content(Some(music_label(audio.music_enabled)));
            let btn_clone = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let playing = g.driver.session().state().phase != GamePhase::Menu
                    && !g.driver.session().state().is_ended();
                let on = g.audio.toggle_music(playing);
                btn_clone.set_text_content(Some(music_label(on)));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn sound_label(on: bool) -> &'static str {
        if on { "🔊" } else { "🔇" }
    }

    fn music_label(on: bool) -> &'static str {
        if on { "🎵" } else { "🎵❌" }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    // No callbacks arrive while hidden
                    g.driver.reset_clock();
                    if g.driver.session().state().is_running() {
                        g.driver.session_mut().set_paused(true);
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.driver.session().state().is_running() {
                    g.driver.session_mut().set_paused(true);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Headless run: cards are hit as they arrive and every decision takes the first option
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use revenue_road::consts::NOMINAL_FRAME_MS;
    use revenue_road::renderer::StaticAssets;
    use revenue_road::sim::{GameEvent, Session};
    use revenue_road::{FrameDriver, Settings, ThemeCatalog, Tuning};

    env_logger::init();
    log::info!("Revenue Road (native) starting...");
    log::info!("Native mode runs a headless session - run with `trunk serve` for web version");

    let mut args = std::env::args().skip(1);
    let theme_id = args.next().unwrap_or_else(|| "tech".to_string());
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let themes = ThemeCatalog::builtin().expect("Failed to parse business themes");
    let Some(theme) = themes.get(&theme_id).cloned() else {
        let ids: Vec<&str> = themes.iter().map(|t| t.id.as_str()).collect();
        log::error!("Unknown business '{}', expected one of {:?}", theme_id, ids);
        std::process::exit(1);
    };

    let settings = Settings::default();
    let mut driver = FrameDriver::new(Session::new(seed, Tuning::default(), &settings), &settings);
    driver.session_mut().start(theme);

    let assets = StaticAssets::none();
    let mut now = 0.0;
    // Generous upper bound; a run always ends well before this
    for _ in 0..200_000 {
        driver.frame(now, &assets);
        now += NOMINAL_FRAME_MS;

        for event in driver.drain_events() {
            match event {
                GameEvent::MonthEnded { month, payout } => {
                    log::info!("Month {} begins after +${} revenue", month, payout)
                }
                other => log::debug!("{:?}", other),
            }
        }

        let session = driver.session_mut();
        if session.state().pending_decision().is_some() {
            session.choose(0);
        }
        if session.state().is_ended() {
            break;
        }
    }

    let state = driver.session().state();
    match state.outcome() {
        Some(outcome) => println!(
            "{}: {:?} with ${} after {} months",
            state.theme_name(),
            outcome,
            state.cash,
            state.month.saturating_sub(1)
        ),
        None => println!("{}: run did not finish (${})", state.theme_name(), state.cash),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
