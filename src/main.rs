//! Gemini Wings entry point
//!
//! Handles platform-specific initialization and drives the frame scheduler.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use gemini_wings::commentary::{CommentaryService, GeminiClient};
    use gemini_wings::consts::{FIELD_HEIGHT, FIELD_WIDTH};
    use gemini_wings::controller::CommentaryState;
    use gemini_wings::persistence::LocalStorage;
    use gemini_wings::platform::RawInput;
    use gemini_wings::renderer::{Frame, RenderState};
    use gemini_wings::scheduler::{FrameTicket, PhaseStart};
    use gemini_wings::sim::{Phase, RandGapSource};
    use gemini_wings::{Controller, FrameScheduler, Tuning};

    const LOADING_TEXT: &str = "Analyzing your flight...";

    /// Game instance holding all state
    struct Game {
        controller: Controller<LocalStorage>,
        scheduler: FrameScheduler<RandGapSource<rand_pcg::Pcg32>>,
        render_state: Option<RenderState>,
        commentary: Rc<CommentaryService<GeminiClient>>,
    }

    impl Game {
        /// Draw a frame, recovering a lost surface once
        fn present(&mut self, frame: &Frame) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(frame) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                        if let Err(e) = render_state.render(frame) {
                            log::warn!("Render error after resize: {:?}", e);
                        }
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD and overlays in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let phase = self.controller.phase();
            let scores = self.controller.scores();

            set_visible(&document, "start-screen", phase == Phase::Menu);
            set_visible(&document, "hud", phase == Phase::Playing);
            set_visible(&document, "game-over", phase == Phase::GameOver);

            set_text(&document, "hud-score", &scores.current.to_string());
            set_text(&document, "menu-high", &scores.high.to_string());
            set_text(&document, "final-score", &scores.current.to_string());
            set_text(&document, "high-score", &scores.high.to_string());

            let commentary = match self.controller.commentary() {
                CommentaryState::Idle => "",
                CommentaryState::Loading => LOADING_TEXT,
                CommentaryState::Ready(text) => text.as_str(),
            };
            set_text(&document, "commentary", commentary);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Gemini Wings starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Field is fixed; CSS scales the element, the backing store follows DPR
        let dpr = window.device_pixel_ratio();
        let width = (FIELD_WIDTH as f64 * dpr) as u32;
        let height = (FIELD_HEIGHT as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let scheduler = FrameScheduler::new(Tuning::default(), RandGapSource::seeded(seed))
            .expect("default tuning is valid");
        log::info!("Obstacle course seeded with: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            controller: Controller::new(LocalStorage::open()),
            scheduler,
            render_state: None,
            commentary: Rc::new(CommentaryService::new(GeminiClient::from_build_env())),
        }));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device, drawing disabled: {}", e),
        }

        // Title screen
        {
            let mut g = game.borrow_mut();
            if let PhaseStart::Static(frame) = g.scheduler.enter_phase(Phase::Menu) {
                g.present(&frame);
            }
            g.update_hud();
        }

        setup_input_handlers(&canvas, game.clone());
        setup_start_buttons(game);

        log::info!("Gemini Wings running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let (key, code) = (event.key(), event.code());
                if !(RawInput::Key { key: &key, code: &code }).is_impulse() {
                    return;
                }
                let mut g = game.borrow_mut();
                if g.scheduler.request_impulse() {
                    // keep Space from scrolling the page
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse, pen and touch
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if !RawInput::Pointer.is_impulse() {
                    return;
                }
                if game.borrow_mut().scheduler.request_impulse() {
                    event.prevent_default();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    start_round(game.clone());
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn start_round(game: Rc<RefCell<Game>>) {
        let ticket = {
            let mut g = game.borrow_mut();
            if !g.controller.start_round() {
                return;
            }
            let phase = g.controller.phase();
            let start = g.scheduler.enter_phase(phase);
            g.update_hud();
            match start {
                PhaseStart::Scheduled(ticket) => ticket,
                PhaseStart::Static(frame) => {
                    g.present(&frame);
                    return;
                }
            }
        };
        request_animation_frame(game, ticket);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, ticket: FrameTicket) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game, ticket);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, ticket: FrameTicket) {
        let next = {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            let Some(output) = g.scheduler.on_frame(ticket, &mut g.controller) else {
                return;
            };
            g.present(&output.frame);
            g.update_hud();
            output.next
        };

        match next {
            Some(ticket) => request_animation_frame(game, ticket),
            None => fetch_commentary(game),
        }
    }

    /// Fire-and-forget; the controller drops the reply if a newer round began
    fn fetch_commentary(game: Rc<RefCell<Game>>) {
        let (request, service) = {
            let mut g = game.borrow_mut();
            (g.controller.take_commentary_request(), g.commentary.clone())
        };
        let Some(request) = request else {
            return;
        };

        wasm_bindgen_futures::spawn_local(async move {
            let text = service
                .get_commentary(request.score, request.prior_high)
                .await;
            let mut g = game.borrow_mut();
            if g.controller.resolve_commentary(request.round, text) {
                g.update_hud();
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;

    use gemini_wings::commentary::{CommentaryService, OfflineProvider};
    use gemini_wings::controller::CommentaryState;
    use gemini_wings::persistence::FileStorage;
    use gemini_wings::renderer::tessellate;
    use gemini_wings::scheduler::PhaseStart;
    use gemini_wings::sim::{Phase, RandGapSource, autopilot};
    use gemini_wings::{Controller, FrameScheduler, Tuning};

    const DEFAULT_SAVE_FILE: &str = "gemini-wings-save.json";
    /// Five minutes at 60 Hz
    const MAX_FRAMES: u64 = 60 * 60 * 5;

    /// One autopilot round without a window
    pub fn run() -> Result<(), Box<dyn Error>> {
        let tuning = match std::env::args().nth(1) {
            Some(path) => {
                log::info!("Loading tuning from {}", path);
                Tuning::from_json(&std::fs::read_to_string(&path)?)?
            }
            None => Tuning::default(),
        };

        let save_file =
            std::env::var("GEMINI_WINGS_SAVE").unwrap_or_else(|_| DEFAULT_SAVE_FILE.to_string());
        let mut controller = Controller::new(FileStorage::new(save_file));
        let mut scheduler = FrameScheduler::new(tuning, RandGapSource::from_entropy())?;

        if let PhaseStart::Static(frame) = scheduler.enter_phase(Phase::Menu) {
            log::debug!("Menu frame: {} vertices", tessellate(&frame).len());
        }

        controller.start_round();
        let PhaseStart::Scheduled(mut ticket) = scheduler.enter_phase(controller.phase()) else {
            return Err("round did not start".into());
        };

        let mut frames = 0;
        loop {
            if autopilot::wants_impulse(scheduler.state()) {
                scheduler.request_impulse();
            }
            let Some(output) = scheduler.on_frame(ticket, &mut controller) else {
                break;
            };
            frames += 1;
            match output.next {
                Some(next) if frames < MAX_FRAMES => ticket = next,
                Some(_) => {
                    log::info!("Frame cap reached, stopping");
                    scheduler.stop();
                    break;
                }
                None => {
                    log::debug!("Final frame: {} vertices", tessellate(&output.frame).len());
                    break;
                }
            }
        }

        if let Some(request) = controller.take_commentary_request() {
            let service = CommentaryService::new(OfflineProvider);
            let text = pollster::block_on(service.get_commentary(request.score, request.prior_high));
            controller.resolve_commentary(request.round, text);
        }

        let scores = controller.scores();
        println!("Frames:     {}", frames);
        println!("Score:      {}", scores.current);
        println!("High score: {}", scores.high);
        if let CommentaryState::Ready(text) = controller.commentary() {
            println!("Commentary: {}", text);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gemini Wings (native, headless autopilot) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
