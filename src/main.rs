//! Motion Race entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlInputElement, KeyboardEvent};

    use motion_race::controls::{self, Command, Slider, SliderTarget};
    use motion_race::renderer::{CanvasPainter, FrameView, SpriteCache, draw_frame};
    use motion_race::sim::{FrameClock, ParamChange, Race, SimulationStatus, Transition};
    use motion_race::{ROSTER, Settings};

    /// Application instance holding all state
    struct App {
        race: Race,
        clock: FrameClock,
        painter: CanvasPainter,
        sliders: Vec<Slider>,
        /// Status the DOM currently reflects
        shown_status: Option<SimulationStatus>,
    }

    impl App {
        fn new(settings: &Settings, painter: CanvasPainter) -> Self {
            Self {
                race: Race::new(&ROSTER, settings.defaults, settings.trail),
                clock: FrameClock::new(settings.step_mode, settings.max_substeps),
                painter,
                sliders: controls::sidebar(ROSTER.iter().map(|c| c.id)),
                shown_status: None,
            }
        }

        fn on_transition(&mut self, transition: Option<Transition>) {
            if let Some(t) = transition {
                if t.entered_running() {
                    self.clock.restart();
                }
            }
        }

        fn command(&mut self, command: Command) {
            let transition = controls::apply(&mut self.race, command);
            self.on_transition(transition);
        }

        /// Run physics steps for this frame (only while running)
        fn update(&mut self, time: f64) {
            if self.race.status() != SimulationStatus::Running {
                return;
            }
            let steps = self.clock.advance(time);
            for _ in 0..steps {
                if self.race.tick().is_some() {
                    break;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let (width, height) = self.painter.fit_to_parent();
            let view = FrameView::from_race(&self.race);
            draw_frame(&mut self.painter, &view, width, height);
        }

        /// Reflect status in the DOM (button, status text, slider locks)
        fn update_hud(&mut self, document: &Document) {
            let status = self.race.status();
            if self.shown_status == Some(status) {
                return;
            }
            self.shown_status = Some(status);

            if let Some(el) = document.get_element_by_id("status-value") {
                el.set_text_content(Some(status.as_str()));
                let _ = el.set_attribute(
                    "class",
                    if status == SimulationStatus::Running { "status running" } else { "status" },
                );
            }
            if let Some(btn) = document.get_element_by_id("toggle-btn") {
                btn.set_text_content(Some(controls::toggle_label(status)));
                let _ = btn.set_attribute("class", controls::toggle_class(status));
            }
            for slider in &self.sliders {
                if let Some(input) = slider_input(document, slider) {
                    input.set_disabled(!slider.enabled(status));
                }
                self.sync_slider(document, slider);
            }
        }

        /// Show the stored value for a slider
        fn sync_slider(&self, document: &Document, slider: &Slider) {
            let Some(value) = slider.stored_value(&self.race) else {
                return;
            };
            if let Some(input) = slider_input(document, slider) {
                input.set_value(&value.to_string());
            }
            if let Some(label) = document.get_element_by_id(&format!("{}-value", slider.element_id())) {
                label.set_text_content(Some(&slider.format_value(value)));
            }
        }
    }

    fn slider_input(document: &Document, slider: &Slider) -> Option<HtmlInputElement> {
        document
            .get_element_by_id(&slider.element_id())?
            .dyn_into::<HtmlInputElement>()
            .ok()
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Motion Race starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let settings = Settings::load();
        let sprites = SpriteCache::preload(&ROSTER);
        let painter = CanvasPainter::new(canvas, sprites)?;
        let app = Rc::new(RefCell::new(App::new(&settings, painter)));

        log::info!("Race ready with {:?} stepping", settings.step_mode);

        build_sidebar(&document, app.clone())?;
        setup_buttons(&document, app.clone())?;
        setup_keyboard(&window, app.clone())?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        // Start frame loop
        request_animation_frame(app);

        log::info!("Motion Race running!");
        Ok(())
    }

    /// Create one labelled range input per slider
    fn build_sidebar(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let track_panel = document
            .get_element_by_id("track-controls")
            .ok_or_else(|| JsValue::from_str("no #track-controls"))?;
        let racer_panel = document
            .get_element_by_id("object-controls")
            .ok_or_else(|| JsValue::from_str("no #object-controls"))?;

        let mut groups: Vec<(String, Element)> = Vec::new();
        let sliders = app.borrow().sliders.clone();

        for slider in sliders {
            let parent = match &slider.target {
                SliderTarget::Track => track_panel.clone(),
                SliderTarget::Object(id) => match groups.iter().find(|(k, _)| k == id) {
                    Some((_, group)) => group.clone(),
                    None => {
                        let group = racer_group(document, id)?;
                        racer_panel.append_child(&group)?;
                        groups.push((id.clone(), group.clone()));
                        group
                    }
                },
            };
            let row = slider_row(document, &slider)?;
            parent.append_child(&row)?;
            attach_slider(document, &slider, app.clone())?;
        }

        let mut a = app.borrow_mut();
        a.shown_status = None;
        a.update_hud(document);
        Ok(())
    }

    fn racer_group(document: &Document, id: &str) -> Result<Element, JsValue> {
        let group = document.create_element("section")?;
        group.set_id(&format!("racer-{}", id));
        group.set_class_name("racer-group");
        if let Some(character) = ROSTER.iter().find(|c| c.id == id) {
            let heading = document.create_element("h3")?;
            heading.set_text_content(Some(character.name));
            heading.set_attribute("style", &format!("color: {}", character.color))?;
            group.append_child(&heading)?;
        }
        Ok(group)
    }

    fn slider_row(document: &Document, slider: &Slider) -> Result<Element, JsValue> {
        let id = slider.element_id();
        let range = slider.field.range();

        let row = document.create_element("div")?;
        row.set_class_name("slider-row");

        let label = document.create_element("label")?;
        label.set_attribute("for", &id)?;
        label.set_text_content(Some(slider.field.label()));
        row.append_child(&label)?;

        let value = document.create_element("span")?;
        value.set_id(&format!("{}-value", id));
        value.set_class_name("slider-value");
        row.append_child(&value)?;

        let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
        input.set_type("range");
        input.set_id(&id);
        input.set_min(&range.min.to_string());
        input.set_max(&range.max.to_string());
        input.set_step(&range.step.to_string());
        row.append_child(&input)?;

        Ok(row)
    }

    fn attach_slider(document: &Document, slider: &Slider, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let input = slider_input(document, slider)
            .ok_or_else(|| JsValue::from_str("slider input missing"))?;

        let slider = slider.clone();
        let document = document.clone();
        let input_clone = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let value = input_clone.value_as_number() as f32;
            let mut a = app.borrow_mut();
            match slider.submit(&mut a.race, value) {
                Ok(ParamChange::Applied) => {}
                Ok(ParamChange::Locked) => {
                    log::debug!("{} locked while {}", slider.element_id(), a.race.status().as_str());
                }
                Err(e) => log::warn!("Slider {}: {}", slider.element_id(), e),
            }
            a.sync_slider(&document, &slider);
        });
        input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        for (id, command) in [("toggle-btn", Command::Toggle), ("reset-btn", Command::Reset)] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Button #{} not found", id);
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().command(command);
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            // Leave typing in form fields alone
            if let Some(target) = event.target() {
                if target.dyn_ref::<HtmlInputElement>().is_some_and(|i| i.type_() != "range") {
                    return;
                }
            }
            if let Some(command) = controls::command_for_key(&event.code(), &event.key()) {
                if command == Command::Toggle {
                    event.prevent_default();
                }
                app.borrow_mut().command(command);
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.update(time);
            a.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.update_hud(&document);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_app::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Motion Race (native) starting...");
    log::info!("The visual race runs in the browser - build with `trunk serve` for the web version");

    headless_race(&motion_race::Settings::load());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Run a race without rendering and log each finish
#[cfg(not(target_arch = "wasm32"))]
fn headless_race(settings: &motion_race::Settings) {
    use motion_race::ROSTER;
    use motion_race::sim::{Race, SimulationStatus};

    // Ten simulated minutes is far beyond any race the sliders allow
    const MAX_TICKS: u64 = 10 * 60 * 60;

    let mut race = Race::new(&ROSTER, settings.defaults, settings.trail);
    let mut finished = vec![false; race.objects().len()];
    let mut elapsed = 0.0f32;
    race.start();

    while race.status() == SimulationStatus::Running && race.ticks() < MAX_TICKS {
        elapsed += race.step_dt();
        race.tick();
        for (done, object) in finished.iter_mut().zip(race.objects()) {
            if object.is_finished() && !*done {
                *done = true;
                log::info!(
                    "{} crossed {:.0} m at {:.2} s (tick {})",
                    object.character.name,
                    race.track().max_distance,
                    elapsed,
                    race.ticks()
                );
            }
        }
    }

    if race.status() == SimulationStatus::Finished {
        log::info!("Race finished after {} ticks", race.ticks());
    } else {
        for object in race.objects().iter().filter(|o| !o.is_finished()) {
            log::warn!(
                "{} stalled at {:.1} m (net force too low to reach the line)",
                object.character.name,
                object.position()
            );
        }
    }
}
