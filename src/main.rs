//! Ball Pit entry point
//!
//! Web: canvas driver (tap to spawn, buttons for gravity/clear/start-stop).
//! Native: headless run that prints the final world as JSON.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};

    use ball_pit::SimConfig;
    use ball_pit::consts::NOMINAL_FRAME_MS;
    use ball_pit::sim::{Command, Simulation};

    /// Velocity overlay length per unit speed
    const VELOCITY_SCALE: f64 = 5.0;

    /// App instance holding all state
    struct App {
        sim: Simulation,
        ctx: CanvasRenderingContext2d,
        canvas: HtmlCanvasElement,
        last_time: f64,
        show_velocity: bool,
    }

    impl App {
        /// Canvas-relative pixel position from client coordinates
        fn to_canvas(&self, client_x: f64, client_y: f64) -> (f64, f64) {
            let rect = self.canvas.get_bounding_client_rect();
            let scale_x = self.canvas.width() as f64 / rect.width().max(1.0);
            let scale_y = self.canvas.height() as f64 / rect.height().max(1.0);
            (
                (client_x - rect.left()) * scale_x,
                (client_y - rect.top()) * scale_y,
            )
        }

        fn frame(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                NOMINAL_FRAME_MS
            };
            self.last_time = time;

            self.sim.step(elapsed);
            self.render();
            self.update_hud();
        }

        fn render(&self) {
            let (width, height) = self.sim.world().bounds();
            self.ctx.clear_rect(0.0, 0.0, width, height);

            for body in self.sim.world().bodies() {
                self.ctx.begin_path();
                let _ = self.ctx.arc(body.pos.x, body.pos.y, body.radius(), 0.0, TAU);
                self.ctx.set_fill_style_str(&body.color().css());
                self.ctx.fill();

                if self.show_velocity {
                    self.ctx.begin_path();
                    self.ctx.move_to(body.pos.x, body.pos.y);
                    self.ctx.line_to(
                        body.pos.x + body.vel.x * VELOCITY_SCALE,
                        body.pos.y + body.vel.y * VELOCITY_SCALE,
                    );
                    self.ctx.set_stroke_style_str("rgba(255, 255, 255, 0.6)");
                    self.ctx.stroke();
                }
            }
        }

        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("object-count") {
                el.set_text_content(Some(&self.sim.body_count().to_string()));
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Ball Pit starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no #canvas element")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d context unavailable")?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let config = SimConfig {
            width: canvas.width() as f64,
            height: canvas.height() as f64,
            seed: Some(seed),
            ..Default::default()
        };
        let sim = Simulation::from_config(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Simulation initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            sim,
            ctx,
            canvas: canvas.clone(),
            last_time: 0.0,
            show_velocity: true,
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_button(&document, "gravity-btn", app.clone(), |app| {
            app.sim.enqueue(Command::ToggleGravity)
        });
        setup_button(&document, "clear-btn", app.clone(), |app| {
            app.sim.enqueue(Command::Clear)
        });
        setup_button(&document, "start-btn", app.clone(), |app| {
            let command = if app.sim.is_running() {
                Command::Stop
            } else {
                Command::Start
            };
            app.sim.enqueue(command);
        });
        setup_button(&document, "velocity-btn", app.clone(), |app| {
            app.show_velocity = !app.show_velocity;
        });

        request_animation_frame(app);
        log::info!("Ball Pit running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse click
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let (x, y) = a.to_canvas(event.client_x() as f64, event.client_y() as f64);
                a.sim.enqueue(Command::Spawn { x, y });
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: one body per new touch point
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        let (x, y) = a.to_canvas(touch.client_x() as f64, touch.client_y() as f64);
                        a.sim.enqueue(Command::Spawn { x, y });
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_button<F>(document: &web_sys::Document, id: &str, app: Rc<RefCell<App>>, mut on_click: F)
    where
        F: FnMut(&mut App) + 'static,
    {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Button #{} not found", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            on_click(&mut app.borrow_mut());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            app_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn app_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: `ball-pit [config.json] [frames]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ball Pit (native) starting...");

    if let Err(e) = run_headless() {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run_headless() -> Result<(), Box<dyn std::error::Error>> {
    use ball_pit::SimConfig;
    use ball_pit::sim::Simulation;

    const DEFAULT_FRAMES: u64 = 600;
    /// Bodies dropped along the top edge at startup
    const BURST: usize = 20;

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimConfig::from_json(&std::fs::read_to_string(&path)?)?,
        None => SimConfig::default(),
    };
    let frames = match args.next() {
        Some(n) => n.parse::<u64>()?,
        None => DEFAULT_FRAMES,
    };

    let mut sim = Simulation::from_config(&config)?;
    let spacing = config.width / (BURST + 1) as f64;
    for i in 0..BURST {
        let x = spacing * (i + 1) as f64;
        if let Err(e) = sim.spawn_at(x, config.radius_max) {
            log::warn!("Spawn {} skipped: {}", i, e);
        }
    }

    let mut contacts = 0;
    for _ in 0..frames {
        contacts += sim.step(config.nominal_frame_ms).contacts;
    }

    log::info!(
        "Ran {} frames: {} bodies, {} contacts, kinetic energy {:.3}",
        sim.frame(),
        sim.body_count(),
        contacts,
        sim.world().kinetic_energy()
    );
    println!("{}", serde_json::to_string_pretty(sim.world())?);
    Ok(())
}
