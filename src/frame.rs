use crate::host;
use crate::State;
use linkfx_core::RedrawThrottle;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Tick = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Self-owned requestAnimationFrame loop that asks the host to redraw at the
/// throttle rate while anything is animating, and parks itself otherwise.
///
/// The loop only triggers redraws; the rope step happens inside the host's
/// own draw of each link.
#[derive(Clone)]
pub struct RedrawLoop {
    running: Rc<Cell<bool>>,
    tick: Tick,
}

impl RedrawLoop {
    pub fn new(state: Rc<RefCell<State>>) -> Self {
        let running = Rc::new(Cell::new(false));
        let tick: Tick = Rc::new(RefCell::new(None));
        let tick_clone = tick.clone();
        let running_tick = running.clone();
        let mut throttle = RedrawThrottle::default();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |now_ms: f64| {
            let (animating, canvas) = {
                let s = state.borrow();
                (s.config.is_animating(), s.host_canvas.clone())
            };
            if !animating {
                running_tick.set(false);
                throttle.reset();
                log::debug!("[sched] nothing animating, loop parked");
                return;
            }
            if throttle.poll(now_ms) {
                if let Some(c) = &canvas {
                    host::set_dirty(c);
                }
            }
            request_frame(&tick_clone);
        }) as Box<dyn FnMut(f64)>));
        Self { running, tick }
    }

    /// Starts the loop if it is parked. Cheap to call on every setting change.
    pub fn wake(&self) {
        if !self.running.replace(true) {
            log::debug!("[sched] loop started");
            request_frame(&self.tick);
        }
    }
}

fn request_frame(tick: &Tick) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
