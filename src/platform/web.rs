//! Browser glue: requestAnimationFrame scheduling, window pointer listeners
//! and the JS-facing handle.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Window};

use super::{FrameScheduler, Host};
use crate::Viewport;
use crate::renderer::dom::DomSink;
use crate::settings::Tuning;
use crate::sim::{PointerEvent, ShapeBounds, Simulation};

type WebHost = Host<RafScheduler, DomSink>;
type PointerClosure = Closure<dyn FnMut(web_sys::PointerEvent)>;

const TOKEN_CLASS: &str = "heart-token";
const POINTER_EVENTS: [&str; 4] = ["pointerdown", "pointermove", "pointerup", "pointercancel"];

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
}

/// requestAnimationFrame with one long-lived callback
pub struct RafScheduler {
    window: Window,
    callback: Option<Closure<dyn FnMut(f64)>>,
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: None,
        }
    }

    pub fn set_callback(&mut self, callback: Closure<dyn FnMut(f64)>) {
        self.callback = Some(callback);
    }

    pub fn drop_callback(&mut self) {
        self.callback = None;
    }
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let callback = self.callback.as_ref()?;
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: i32) {
        let _ = self.window.cancel_animation_frame(handle);
    }
}

fn viewport(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

fn to_event(kind: &str, event: &web_sys::PointerEvent) -> Option<PointerEvent> {
    let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
    let pointer = event.pointer_id();
    match kind {
        "pointerdown" => Some(PointerEvent::Down { pos, pointer }),
        "pointermove" => Some(PointerEvent::Move { pos, pointer }),
        "pointerup" => Some(PointerEvent::Up { pos, pointer }),
        "pointercancel" => Some(PointerEvent::Cancel { pos, pointer }),
        _ => None,
    }
}

/// Mounted heart-toss instance
#[wasm_bindgen]
pub struct HeartToss {
    window: Window,
    host: Rc<RefCell<WebHost>>,
    listeners: Vec<(&'static str, PointerClosure)>,
    destroyed: bool,
}

#[wasm_bindgen]
impl HeartToss {
    /// Mount into the element with id `container_id`
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str) -> Result<HeartToss, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{}", container_id)))?;

        let seed = js_sys::Date::now() as u64;
        let sim = Simulation::new(seed, Tuning::load(), ShapeBounds::heart());
        let sink = DomSink::new(document, container, TOKEN_CLASS);
        let host = Rc::new(RefCell::new(Host::new(
            sim,
            RafScheduler::new(window.clone()),
            sink,
        )));

        let frame = {
            let weak = Rc::downgrade(&host);
            let window = window.clone();
            Closure::<dyn FnMut(f64)>::new(move |now: f64| {
                if let Some(host) = weak.upgrade() {
                    host.borrow_mut().on_frame(now, viewport(&window));
                }
            })
        };
        host.borrow_mut().scheduler_mut().set_callback(frame);

        let mut toss = HeartToss {
            window,
            host,
            listeners: Vec::new(),
            destroyed: false,
        };
        toss.add_listeners()?;
        toss.host.borrow_mut().mount();
        log::info!("Heart toss mounted (seed {})", seed);
        Ok(toss)
    }

    fn add_listeners(&mut self) -> Result<(), JsValue> {
        // Only a press may need preventDefault; the rest stay passive
        let active = AddEventListenerOptions::new();
        active.set_capture(true);
        active.set_passive(false);
        let passive = AddEventListenerOptions::new();
        passive.set_capture(true);
        passive.set_passive(true);

        for kind in POINTER_EVENTS {
            let weak: Weak<RefCell<WebHost>> = Rc::downgrade(&self.host);
            let closure = PointerClosure::new(move |event: web_sys::PointerEvent| {
                let Some(host) = weak.upgrade() else {
                    return;
                };
                let Some(ev) = to_event(kind, &event) else {
                    return;
                };
                if host.borrow_mut().pointer(ev) {
                    // Grab consumed the press
                    event.prevent_default();
                    event.stop_propagation();
                }
            });
            self.window
                .add_event_listener_with_callback_and_add_event_listener_options(
                    kind,
                    closure.as_ref().unchecked_ref(),
                    if kind == "pointerdown" { &active } else { &passive },
                )?;
            self.listeners.push((kind, closure));
        }
        Ok(())
    }

    /// Spawn trigger. `hint` is the horizontal center in px.
    pub fn spawn(&self, hint: Option<f64>) -> u32 {
        let viewport = viewport(&self.window);
        self.host
            .borrow_mut()
            .spawn(viewport, hint.map(|h| h as f32))
            .0
    }

    /// Clear trigger; returns how many tokens were removed
    pub fn clear(&self) -> u32 {
        self.host.borrow_mut().clear() as u32
    }

    #[wasm_bindgen(getter)]
    pub fn live_count(&self) -> u32 {
        self.host.borrow().sim().bodies().len() as u32
    }

    /// Unmount: cancel the pending frame, remove listeners and elements.
    /// Safe to call more than once; also runs when JS frees the handle.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for (kind, closure) in self.listeners.drain(..) {
            let _ = self.window.remove_event_listener_with_callback_and_bool(
                kind,
                closure.as_ref().unchecked_ref(),
                true,
            );
        }
        let mut host = self.host.borrow_mut();
        host.unmount();
        host.scheduler_mut().drop_callback();
        host.sink_mut().detach_all();
        log::info!("Heart toss destroyed");
    }
}

impl Drop for HeartToss {
    fn drop(&mut self) {
        self.destroy();
    }
}
