//! Pocket Arcade entry point
//!
//! In the browser this mounts the game for the current route and drives it
//! from `requestAnimationFrame`. Natively it runs both games headless with
//! a simple autopilot and logs the results.

#[cfg(not(target_arch = "wasm32"))]
use pocket_arcade::Settings;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        Document, Element, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent,
        Response, TouchEvent,
    };

    use pocket_arcade::emulator::{
        EmulatorController, EmulatorCore, NesButton, ROM_LIBRARY, RomEntry,
    };
    use pocket_arcade::input::{Button, Intent, RawEvent};
    use pocket_arcade::renderer::{DrawList, RenderState};
    use pocket_arcade::sim::{FlappyState, GridState};
    use pocket_arcade::{ArcadeError, Route, Session, Settings};

    // Thin wrapper over the page's Nostalgist runtime. Launch is async on the
    // JS side; failures are parked and picked up by the frame loop.
    #[wasm_bindgen(inline_js = "
        export class NesBridge {
            constructor(canvasId) {
                this.canvasId = canvasId;
                this.core = null;
                this.pending = null;
                this.error = null;
            }
            launch(rom) {
                const runtime = globalThis.Nostalgist;
                if (!runtime) {
                    throw new Error('Nostalgist runtime not loaded');
                }
                const bytes = new Uint8Array(rom);
                this.error = null;
                this.pending = runtime.launch({
                    core: 'fceumm',
                    element: document.getElementById(this.canvasId),
                    rom: new File([bytes], 'game.nes'),
                    retroarchConfig: { rewind_enable: true },
                    retroarchCoreConfig: { fceumm_turbo_enable: 'Both' },
                }).then((core) => {
                    this.pending = null;
                    this.core = core;
                    return core;
                }).catch((err) => {
                    this.pending = null;
                    this.error = String(err);
                    return null;
                });
            }
            press_down(button) {
                if (this.core) { this.core.pressDown(button); }
            }
            press_up(button) {
                if (this.core) { this.core.pressUp(button); }
            }
            exit() {
                const core = this.core;
                this.core = null;
                if (core) {
                    core.exit();
                } else if (this.pending) {
                    this.pending.then((c) => c && c.exit());
                    this.pending = null;
                }
            }
            take_error() {
                const err = this.error;
                this.error = null;
                return err;
            }
        }
    ")]
    extern "C" {
        type NesBridge;

        #[wasm_bindgen(constructor)]
        fn new(canvas_id: &str) -> NesBridge;

        #[wasm_bindgen(method, catch)]
        fn launch(this: &NesBridge, rom: &[u8]) -> Result<(), JsValue>;

        #[wasm_bindgen(method)]
        fn press_down(this: &NesBridge, button: &str);

        #[wasm_bindgen(method)]
        fn press_up(this: &NesBridge, button: &str);

        #[wasm_bindgen(method)]
        fn exit(this: &NesBridge);

        #[wasm_bindgen(method)]
        fn take_error(this: &NesBridge) -> Option<String>;
    }

    struct JsCore(NesBridge);

    impl EmulatorCore for JsCore {
        fn launch(&mut self, rom: &[u8]) -> Result<(), ArcadeError> {
            self.0
                .launch(rom)
                .map_err(|e| ArcadeError::EmulatorLaunch(js_message(&e)))
        }

        fn press_down(&mut self, button: NesButton) {
            self.0.press_down(button.name());
        }

        fn press_up(&mut self, button: NesButton) {
            self.0.press_up(button.name());
        }

        fn exit(&mut self) {
            self.0.exit();
        }
    }

    /// What the page is running
    enum Mounted {
        Snake(Session<GridState>),
        Flappy(Session<FlappyState>),
        Nes(EmulatorController<JsCore>),
    }

    /// Page-wide state shared by every callback
    struct App {
        mounted: Mounted,
        render_state: Option<RenderState>,
        draw_list: DrawList,
        /// Bumped on teardown; frame callbacks from older generations bail
        generation: u64,
        frame_handle: Option<i32>,
        hud: String,
    }

    impl App {
        fn new(mounted: Mounted) -> Self {
            Self {
                mounted,
                render_state: None,
                draw_list: DrawList::default(),
                generation: 0,
                frame_handle: None,
                hud: String::new(),
            }
        }

        fn event(&mut self, event: RawEvent, now: f64) -> bool {
            match &mut self.mounted {
                Mounted::Snake(session) => session.handle_event(&event, now).is_some(),
                Mounted::Flappy(session) => session.handle_event(&event, now).is_some(),
                Mounted::Nes(_) => false,
            }
        }

        fn key(&mut self, key: String, down: bool, now: f64) -> bool {
            if let Mounted::Nes(controller) = &mut self.mounted {
                if down && key == "Escape" {
                    controller.stop();
                    show_rom_picker(true);
                    return true;
                }
                return controller.key(&key, down);
            }
            let event = if down {
                RawEvent::KeyDown(key)
            } else {
                RawEvent::KeyUp(key)
            };
            self.event(event, now)
        }

        fn pad(&mut self, x: f32, y: f32, size: f32, first: bool, now: f64) {
            match &mut self.mounted {
                Mounted::Snake(session) => session.set_pad_size(size),
                Mounted::Flappy(session) => session.set_pad_size(size),
                Mounted::Nes(controller) => {
                    controller.set_pad_size(size);
                    controller.dpad(x, y);
                    return;
                }
            }
            if first {
                self.event(RawEvent::TouchStart { x, y }, now);
            } else {
                self.event(RawEvent::TouchMove { x, y }, now);
            }
        }

        fn pad_release(&mut self, now: f64) {
            if let Mounted::Nes(controller) = &mut self.mounted {
                controller.dpad_release();
            } else {
                self.event(RawEvent::TouchEnd, now);
            }
        }

        /// Tab hidden or window blurred
        fn focus_lost(&mut self, now: f64) {
            let pause = Intent::Button(Button::PauseToggle);
            match &mut self.mounted {
                Mounted::Snake(session) if session.phase().is_running() => {
                    session.apply(pause, now);
                    log::info!("Auto-paused");
                }
                Mounted::Flappy(session) if session.phase().is_running() => {
                    session.apply(pause, now);
                    log::info!("Auto-paused");
                }
                Mounted::Nes(controller) => controller.release_all(),
                _ => {}
            }
        }

        fn frame(&mut self, now: f64) {
            match &mut self.mounted {
                Mounted::Snake(session) => {
                    session.pump(now);
                    session.draw(&mut self.draw_list);
                }
                Mounted::Flappy(session) => {
                    session.pump(now);
                    session.draw(&mut self.draw_list);
                }
                Mounted::Nes(controller) => {
                    controller.advance(now);
                    if let Some(reason) = controller.core().0.take_error() {
                        controller.stop();
                        report(&ArcadeError::EmulatorLaunch(reason));
                        show_rom_picker(true);
                    }
                    return;
                }
            }
            self.render();
            self.update_hud();
        }

        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.draw_list) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Mirror overlay text into the DOM
        fn update_hud(&mut self) {
            let text = self.draw_list.texts().collect::<Vec<_>>().join("\n");
            if text == self.hud {
                return;
            }
            if let Some(el) = document().and_then(|d| d.get_element_by_id("hud")) {
                el.set_text_content(Some(&text));
            }
            self.hud = text;
        }

        fn teardown(&mut self) {
            self.generation += 1;
            if let (Some(handle), Some(window)) = (self.frame_handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(handle);
            }
            match &mut self.mounted {
                Mounted::Snake(session) => session.teardown(),
                Mounted::Flappy(session) => session.teardown(),
                Mounted::Nes(controller) => controller.stop(),
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    /// Milliseconds on the same clock as animation frame timestamps
    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn js_message(value: &JsValue) -> String {
        value
            .as_string()
            .or_else(|| {
                value
                    .dyn_ref::<js_sys::Error>()
                    .map(|e| String::from(e.message()))
            })
            .unwrap_or_else(|| format!("{:?}", value))
    }

    /// Log an error and show it in the status line
    fn report(err: &ArcadeError) {
        log::error!("{}", err);
        if let Some(el) = document().and_then(|d| d.get_element_by_id("status")) {
            el.set_text_content(Some(&err.to_string()));
        }
    }

    fn clear_status() {
        if let Some(el) = document().and_then(|d| d.get_element_by_id("status")) {
            el.set_text_content(None);
        }
    }

    fn show_rom_picker(visible: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id("rom-picker")) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Pocket Arcade starting...");

        if let Err(err) = start().await {
            report(&err);
        }
    }

    async fn start() -> Result<(), ArcadeError> {
        let window = web_sys::window()
            .ok_or_else(|| ArcadeError::SurfaceUnavailable("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| ArcadeError::SurfaceUnavailable("no document".into()))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let path = window.location().pathname().unwrap_or_default();
        let route = Route::from_path(&path).unwrap_or_else(|| {
            log::warn!("Unknown route {}, showing Snake", path);
            Route::Snake
        });
        if Route::redirects(&path) {
            log::info!("{} → {}", path, route.path());
        }
        if let Some(title) = document.get_element_by_id("title") {
            title.set_text_content(Some(route.title()));
        }

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        log::info!("Mounting {:?} with seed {}", route, seed);

        let (mounted, field) = match route {
            Route::Snake => {
                let grid = settings.grid.clone();
                let (w, h) = grid.pixel_size();
                let session = Session::new(
                    seed,
                    |s| GridState::new(s, grid),
                    settings.grid_keys.clone(),
                    &settings.input,
                );
                (Mounted::Snake(session), Some(Vec2::new(w, h)))
            }
            Route::Flappy => {
                let flappy = settings.flappy.clone();
                let field = Vec2::new(flappy.width, flappy.height);
                let session = Session::new(
                    seed,
                    |s| FlappyState::new(s, flappy),
                    settings.flappy_keys.clone(),
                    &settings.input,
                );
                (Mounted::Flappy(session), Some(field))
            }
            Route::Nes => {
                let core = JsCore(NesBridge::new("nes-canvas"));
                let controller =
                    EmulatorController::new(core, &settings.input, settings.turbo.clone());
                (Mounted::Nes(controller), None)
            }
        };

        let app = Rc::new(RefCell::new(App::new(mounted)));

        if let Some(field) = field {
            let canvas: HtmlCanvasElement = document
                .get_element_by_id("canvas")
                .and_then(|el| el.dyn_into().ok())
                .ok_or_else(|| ArcadeError::SurfaceUnavailable("no #canvas element".into()))?;
            let render_state = init_renderer(&window, canvas.clone(), field).await?;
            app.borrow_mut().render_state = Some(render_state);
            setup_canvas_pointer(&canvas, app.clone());
        } else {
            setup_nes_controls(&document, app.clone());
        }

        setup_keyboard(app.clone());
        setup_dpad(&document, app.clone());
        setup_auto_pause(&document, app.clone());
        setup_teardown(app.clone());

        request_frame(app);

        log::info!("Pocket Arcade running!");
        Ok(())
    }

    async fn init_renderer(
        window: &web_sys::Window,
        canvas: HtmlCanvasElement,
        field: Vec2,
    ) -> Result<RenderState, ArcadeError> {
        let dpr = window.device_pixel_ratio();
        let width = (field.x as f64 * dpr) as u32;
        let height = (field.y as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| ArcadeError::SurfaceUnavailable(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| ArcadeError::AdapterUnavailable(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height, field).await
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        for (name, down) in [("keydown", true), ("keyup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() && down {
                    // Held keys must not re-toggle pause or re-press buttons
                    return;
                }
                if app.borrow_mut().key(event.key(), down, now()) {
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Touch position relative to the element's bounding box, plus the
    /// box's rendered width
    fn touch_offset(el: &Element, event: &TouchEvent) -> Option<(f32, f32, f32)> {
        let touch = event.touches().get(0)?;
        let rect = el.get_bounding_client_rect();
        Some((
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
            rect.width() as f32,
        ))
    }

    fn setup_dpad(document: &Document, app: Rc<RefCell<App>>) {
        let Some(pad) = document.get_element_by_id("dpad") else {
            return;
        };

        for (name, first) in [("touchstart", true), ("touchmove", false)] {
            let app = app.clone();
            let pad_el = pad.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                event.stop_propagation();
                match touch_offset(&pad_el, &event) {
                    Some((x, y, size)) => app.borrow_mut().pad(x, y, size, first, now()),
                    None => app.borrow_mut().pad_release(now()),
                }
            });
            let _ = pad.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["touchend", "touchcancel"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().pad_release(now());
            });
            let _ = pad.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_canvas_pointer(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().event(RawEvent::PointerDown, now());
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().event(RawEvent::PointerDown, now());
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_nes_controls(document: &Document, app: Rc<RefCell<App>>) {
        // Face buttons: id `nes-<button>`, held while touched
        for button in [NesButton::A, NesButton::B, NesButton::Start, NesButton::Select] {
            let Some(el) = document.get_element_by_id(&format!("nes-{}", button.name())) else {
                continue;
            };
            for (name, down) in [
                ("touchstart", true),
                ("mousedown", true),
                ("touchend", false),
                ("touchcancel", false),
                ("mouseup", false),
                ("mouseleave", false),
            ] {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    if let Mounted::Nes(controller) = &mut app.borrow_mut().mounted {
                        if down {
                            controller.press(button);
                        } else {
                            controller.release(button);
                        }
                    }
                });
                let _ = el.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Turbo buttons: id `turbo-a` / `turbo-b`
        for button in [NesButton::A, NesButton::B] {
            let Some(el) = document.get_element_by_id(&format!("turbo-{}", button.name())) else {
                continue;
            };
            for (name, active) in [
                ("touchstart", true),
                ("mousedown", true),
                ("touchend", false),
                ("touchcancel", false),
                ("mouseup", false),
                ("mouseleave", false),
            ] {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    if let Mounted::Nes(controller) = &mut app.borrow_mut().mounted {
                        controller.set_turbo(button, active, now());
                    }
                });
                let _ = el.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Bundled ROMs: id `rom-<id>`
        for entry in ROM_LIBRARY.iter() {
            let Some(el) = document.get_element_by_id(&format!("rom-{}", entry.id)) else {
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                wasm_bindgen_futures::spawn_local(load_library_rom(app.clone(), *entry));
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // User-supplied ROM file
        if let Some(input) = document
            .get_element_by_id("rom-file")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let input_el = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(file) = input_el.files().and_then(|files| files.get(0)) {
                    wasm_bindgen_futures::spawn_local(load_file_rom(app.clone(), file));
                }
            });
            let _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    async fn fetch_rom(path: &str) -> Result<Vec<u8>, ArcadeError> {
        let fail = |reason: String| ArcadeError::RomFetch {
            path: path.to_string(),
            reason,
        };
        let window = web_sys::window().ok_or_else(|| fail("no window".into()))?;
        let value = JsFuture::from(window.fetch_with_str(path))
            .await
            .map_err(|e| fail(js_message(&e)))?;
        let response: Response = value.dyn_into().map_err(|e| fail(js_message(&e)))?;
        if !response.ok() {
            return Err(fail(format!("HTTP {}", response.status())));
        }
        let buffer = JsFuture::from(response.array_buffer().map_err(|e| fail(js_message(&e)))?)
            .await
            .map_err(|e| fail(js_message(&e)))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }

    fn launch(app: &Rc<RefCell<App>>, title: &str, rom: Result<Vec<u8>, ArcadeError>) {
        let result = rom.and_then(|bytes| match &mut app.borrow_mut().mounted {
            Mounted::Nes(controller) => controller.load(title, &bytes),
            _ => Ok(()),
        });
        match result {
            Ok(()) => {
                clear_status();
                show_rom_picker(false);
            }
            Err(err) => {
                report(&err);
                show_rom_picker(true);
            }
        }
    }

    async fn load_library_rom(app: Rc<RefCell<App>>, entry: RomEntry) {
        log::info!("Fetching {} from {}", entry.title, entry.path);
        let rom = fetch_rom(entry.path).await;
        launch(&app, entry.title, rom);
    }

    async fn load_file_rom(app: Rc<RefCell<App>>, file: web_sys::File) {
        let title = file.name();
        let rom = JsFuture::from(file.array_buffer())
            .await
            .map(|buffer| js_sys::Uint8Array::new(&buffer).to_vec())
            .map_err(|e| ArcadeError::RomFetch {
                path: title.clone(),
                reason: js_message(&e),
            });
        launch(&app, &title, rom);
    }

    fn setup_auto_pause(document: &Document, app: Rc<RefCell<App>>) {
        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().focus_lost(now());
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().focus_lost(now());
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_teardown(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().teardown();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let generation = app.borrow().generation;
        let next = app.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(next, generation, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => app.borrow_mut().frame_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {}", js_message(&e)),
        }
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, generation: u64, time: f64) {
        {
            let mut a = app.borrow_mut();
            if a.generation != generation {
                return;
            }
            a.frame_handle = None;
            a.frame(time);
        }

        request_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    web::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use pocket_arcade::consts::FRAME_MS;
    use pocket_arcade::input::{Button, Intent};
    use pocket_arcade::sim::{Direction, FlappyState, GridState};
    use pocket_arcade::{ArcadeGame, Session, Settings};

    /// Fixed so demo runs are comparable
    pub const DEMO_SEED: u64 = 2024;

    /// Best non-fatal step toward the food (wrapped distance)
    fn snake_autopilot(state: &GridState) -> Option<Direction> {
        let (cols, rows) = (state.tuning.cols, state.tuning.rows);
        let wrapped = |d: i32, n: i32| {
            let d = d.rem_euclid(n);
            d.min(n - d)
        };
        Direction::ALL
            .into_iter()
            .filter(|d| !d.is_reverse_of(state.heading))
            .filter(|d| {
                let cell = state.next_head(*d);
                !state.snake.contains(&cell) && !state.obstacles.contains(&cell)
            })
            .min_by_key(|d| {
                let delta = state.food - state.next_head(*d);
                wrapped(delta.x, cols) + wrapped(delta.y, rows)
            })
    }

    pub fn play_snake(settings: &Settings, seed: u64) -> Session<GridState> {
        let grid = settings.grid.clone();
        let mut session = Session::new(
            seed,
            |s| GridState::new(s, grid),
            settings.grid_keys.clone(),
            &settings.input,
        );
        let mut now = 0.0;
        session.apply(Intent::Button(Button::Start), now);
        while session.phase().is_running() && session.ticks() < 5_000 {
            if let Some(direction) = snake_autopilot(session.game()) {
                session.apply(
                    Intent::Steer {
                        direction,
                        resume: false,
                    },
                    now,
                );
            }
            now += session.game().tick_ms as f64;
            session.pump(now);
        }
        session
    }

    pub fn play_flappy(settings: &Settings, seed: u64) -> Session<FlappyState> {
        let flappy = settings.flappy.clone();
        let mut session = Session::new(
            seed,
            |s| FlappyState::new(s, flappy),
            settings.flappy_keys.clone(),
            &settings.input,
        );
        let mut now = 0.0;
        session.apply(Intent::Activate, now);
        while session.phase().is_running() && session.ticks() < 20_000 {
            let state = session.game();
            let tuning = &state.tuning;
            let target = state
                .pipes
                .iter()
                .find(|p| p.x + tuning.pipe_width >= state.actor.pos.x)
                .map(|p| p.top + tuning.pipe_gap * 0.6)
                .unwrap_or(tuning.height * 0.5);
            if state.actor.pos.y + state.actor.size > target && state.actor.velocity >= 0.0 {
                session.apply(Intent::Activate, now);
            }
            now += FRAME_MS;
            session.pump(now);
        }
        session
    }

    pub fn report<G: ArcadeGame + serde::Serialize>(session: &Session<G>) {
        let game = session.game();
        log::info!(
            "{}: {:?} after {} ticks, score {}",
            game.title(),
            game.phase(),
            session.ticks(),
            game.score()
        );
        match serde_json::to_string(game) {
            Ok(json) => log::debug!("{} final state: {}", game.title(), json),
            Err(e) => log::warn!("Could not serialize {}: {}", game.title(), e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pocket Arcade (native) starting...");
    log::info!("The browser build is the playable one; running headless autopilot demo");

    let settings = Settings::load();
    if let Err(e) = settings.validate() {
        log::error!("{}", e);
        std::process::exit(1);
    }

    let mut snake = headless::play_snake(&settings, headless::DEMO_SEED);
    headless::report(&snake);
    snake.teardown();

    let mut flappy = headless::play_flappy(&settings, headless::DEMO_SEED);
    headless::report(&flappy);
    flappy.teardown();
}
