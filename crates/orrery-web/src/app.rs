use std::cell::RefCell;
use std::rc::Rc;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement, MouseEvent, Window};
use orrery_engine::{Game, InputEvent, Renderer};
use crate::gl::WebGlRenderer;
use crate::overlay::TooltipOverlay;
use crate::runner::GameRunner;

struct AppState<G: Game> {
    runner: GameRunner<G>,
    renderer: WebGlRenderer,
    overlay: TooltipOverlay,
    canvas: HtmlCanvasElement,
    window: Window,
}

/// Browser shell around a `GameRunner`: owns the animation-frame callback,
/// the DOM listeners, the renderer and the tooltip overlay.
///
/// Cheap to clone; all clones share the same state. Every frame request
/// goes through `schedule()`.
pub struct WebApp<G: Game + 'static> {
    state: Rc<RefCell<AppState<G>>>,
    frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    pause_listeners: Rc<RefCell<Vec<Box<dyn FnMut(bool)>>>>,
}

impl<G: Game + 'static> Clone for WebApp<G> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            frame: Rc::clone(&self.frame),
            pause_listeners: Rc::clone(&self.pause_listeners),
        }
    }
}

fn find_or_create_canvas(document: &Document, id: &str) -> Result<HtmlCanvasElement, JsValue> {
    if let Some(existing) = document.get_element_by_id(id) {
        return Ok(existing.dyn_into()?);
    }
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_id(id);
    canvas.style().set_property("display", "block")?;
    let body = document.body().ok_or_else(|| JsValue::from_str("document has no <body>"))?;
    body.append_child(&canvas)?;
    Ok(canvas)
}

impl<G: Game + 'static> WebApp<G> {
    /// Initialize `game`, attach to (or create) the canvas `canvas_id` and
    /// start the frame loop.
    pub fn launch(game: G, canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = find_or_create_canvas(&document, canvas_id)?;
        let renderer = WebGlRenderer::new(canvas.clone())?;
        let overlay = TooltipOverlay::new(&document)?;

        let mut runner = GameRunner::new(game);
        runner.init();

        let app = Self {
            state: Rc::new(RefCell::new(AppState {
                runner,
                renderer,
                overlay,
                canvas,
                window,
            })),
            frame: Rc::new(RefCell::new(None)),
            pause_listeners: Rc::new(RefCell::new(Vec::new())),
        };

        app.fit_to_window();
        app.install_frame_callback();
        app.install_listeners()?;
        app.schedule();
        Ok(app)
    }

    /// Request the next animation frame unless the loop is paused or a
    /// frame is already pending.
    pub fn schedule(&self) {
        let (window, requested) = {
            let mut state = self.state.borrow_mut();
            let requested = state.runner.request_frame();
            (state.window.clone(), requested)
        };
        if !requested {
            return;
        }
        let frame = self.frame.borrow();
        let Some(callback) = frame.as_ref() else {
            error!("app: frame callback missing");
            return;
        };
        if let Err(err) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            error!("app: requestAnimationFrame failed: {:?}", err);
        }
    }

    /// Forward an input event to the runner. Resume re-enters the loop.
    /// Pause listeners hear about every actual pause state change, whoever
    /// caused it.
    pub fn dispatch(&self, event: InputEvent) {
        let pause_change = self.state.borrow_mut().runner.push_input(event);
        if event == InputEvent::Resume {
            self.schedule();
        }
        self.sync_overlay();
        if let Some(paused) = pause_change {
            for listener in self.pause_listeners.borrow_mut().iter_mut() {
                listener(paused);
            }
        }
    }

    /// Call `listener` with the new state after every pause or resume.
    /// Listeners must not pause or resume the app themselves.
    pub fn on_pause_change(&self, listener: impl FnMut(bool) + 'static) {
        self.pause_listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn pause(&self) {
        self.dispatch(InputEvent::Pause);
    }

    pub fn resume(&self) {
        self.dispatch(InputEvent::Resume);
    }

    pub fn is_paused(&self) -> bool {
        self.state.borrow().runner.is_paused()
    }

    pub fn custom_event(&self, kind: u32, a: f32, b: f32, c: f32) {
        self.dispatch(InputEvent::Custom { kind, a, b, c });
    }

    fn on_frame(&self, host_ms: f64) {
        let ran = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            let ran = state.runner.tick(host_ms);
            if ran {
                state.renderer.draw(&state.runner.frame_data());
            }
            ran
        };
        if ran {
            self.schedule();
        }
    }

    fn fit_to_window(&self) {
        let (width, height) = {
            let state = self.state.borrow();
            let width = state.window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let height = state.window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            (width, height)
        };
        if width <= 0.0 || height <= 0.0 {
            debug!("app: window has no size yet");
            return;
        }
        {
            let mut state = self.state.borrow_mut();
            let style = state.canvas.style();
            for (name, value) in [("width", width), ("height", height)] {
                if let Err(err) = style.set_property(name, &format!("{value}px")) {
                    error!("app: setting canvas {name} failed: {:?}", err);
                }
            }
            state.renderer.resize(width as u32, height as u32);
        }
        self.dispatch(InputEvent::Resize {
            width: width as f32,
            height: height as f32,
        });
    }

    fn sync_overlay(&self) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let rect = state.canvas.get_bounding_client_rect();
        if let Err(err) = state
            .overlay
            .sync(state.runner.tooltip(), (rect.left(), rect.top()))
        {
            error!("app: tooltip update failed: {:?}", err);
        }
    }

    fn install_frame_callback(&self) {
        let app = self.clone();
        let callback = Closure::wrap(Box::new(move |host_ms: f64| {
            app.on_frame(host_ms);
        }) as Box<dyn FnMut(f64)>);
        *self.frame.borrow_mut() = Some(callback);
    }

    fn install_listeners(&self) -> Result<(), JsValue> {
        let (window, canvas) = {
            let state = self.state.borrow();
            (state.window.clone(), state.canvas.clone())
        };

        let app = self.clone();
        let on_resize = Closure::wrap(Box::new(move || {
            app.fit_to_window();
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        on_resize.forget();

        let app = self.clone();
        let target = canvas.clone();
        let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
            let rect = target.get_bounding_client_rect();
            app.dispatch(InputEvent::PointerMove {
                x: (event.client_x() as f64 - rect.left()) as f32,
                y: (event.client_y() as f64 - rect.top()) as f32,
            });
        }) as Box<dyn FnMut(MouseEvent)>);
        canvas.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        on_move.forget();

        let app = self.clone();
        let on_leave = Closure::wrap(Box::new(move |_event: MouseEvent| {
            app.dispatch(InputEvent::PointerLeave);
        }) as Box<dyn FnMut(MouseEvent)>);
        canvas.add_event_listener_with_callback("mouseleave", on_leave.as_ref().unchecked_ref())?;
        on_leave.forget();

        Ok(())
    }
}
