#![cfg(target_arch = "wasm32")]
use linkfx_core::{
    AnimationMode, Color, CurveEffect, EffectConfig, LinkDraw, LinkRenderer, Outcome,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod canvas;
mod constants;
mod frame;
mod host;

/// Engine state shared between the bindings and the redraw loop.
pub(crate) struct State {
    pub renderer: LinkRenderer,
    pub config: EffectConfig,
    pub host_canvas: Option<JsValue>,
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("linkfx-web starting");
    Ok(())
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Connector renderer handed to the host integration. The integration calls
/// `renderConnector` in place of the host's link drawing and passes the
/// original routine as `native`.
#[wasm_bindgen]
pub struct LinkFx {
    state: Rc<RefCell<State>>,
    redraw: frame::RedrawLoop,
}

#[wasm_bindgen]
impl LinkFx {
    #[wasm_bindgen(constructor)]
    pub fn new() -> LinkFx {
        let state = Rc::new(RefCell::new(State {
            renderer: LinkRenderer::new(),
            config: EffectConfig::default(),
            host_canvas: None,
        }));
        let redraw = frame::RedrawLoop::new(state.clone());
        LinkFx { state, redraw }
    }

    /// Finds the host's graph canvas (retrying until it exists) so the redraw
    /// loop can request frames.
    #[wasm_bindgen(js_name = attachHost)]
    pub fn attach_host(&self) {
        let state = self.state.clone();
        let redraw = self.redraw.clone();
        host::attach_with_retry(move |canvas| {
            state.borrow_mut().host_canvas = Some(canvas);
            redraw.wake();
        });
    }

    /// Panel index of the effect, or `null`/`undefined` for none.
    #[wasm_bindgen(js_name = setEffect)]
    pub fn set_effect(&self, index: Option<u32>) -> Result<(), JsValue> {
        self.update(|config| config.set_effect_index(index.map(|i| i as usize)))
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&self, mode: &str) -> Result<(), JsValue> {
        let mode: AnimationMode = mode.parse().map_err(to_js)?;
        self.update(|config| {
            config.mode = mode;
            Ok::<_, JsValue>(())
        })
    }

    #[wasm_bindgen(js_name = setGravity)]
    pub fn set_gravity(&self, enabled: bool) {
        _ = self.update(|config| {
            config.gravity = enabled;
            Ok::<_, JsValue>(())
        });
    }

    #[wasm_bindgen(js_name = effectNames)]
    pub fn effect_names() -> js_sys::Array {
        CurveEffect::ALL
            .iter()
            .map(|e| JsValue::from_str(e.name()))
            .collect()
    }

    #[wasm_bindgen(js_name = ropeCount)]
    pub fn rope_count(&self) -> u32 {
        self.state.borrow().renderer.ropes().len() as u32
    }

    /// Draws one connector. Returns `true` when the engine painted it and
    /// `false` when it called `native` instead.
    #[wasm_bindgen(js_name = renderConnector)]
    #[allow(clippy::too_many_arguments)]
    pub fn render_connector(
        &self,
        ctx: &web::CanvasRenderingContext2d,
        a: &JsValue,
        b: &JsValue,
        link: &JsValue,
        color: Option<String>,
        selected_nodes: &JsValue,
        native: &js_sys::Function,
    ) -> bool {
        let call_native = || {
            if let Err(e) = native.call0(&JsValue::NULL) {
                log::error!("[host] native link drawing threw: {:?}", e);
            }
        };
        let (Some(a), Some(b)) = (host::point_from_js(a), host::point_from_js(b)) else {
            call_native();
            return false;
        };
        let mut draw = LinkDraw::new(a, b).with_link(host::link_from_js(link));
        if let Some(c) = color.as_deref().and_then(|c| c.parse::<Color>().ok()) {
            draw = draw.with_color(c);
        }

        // The host routine may call back into this object, so the state
        // borrow ends before it runs.
        let outcome = match self.state.try_borrow_mut() {
            Ok(mut state) => {
                let config = state.config;
                let selection = host::JsSelection(selected_nodes);
                let mut surface = canvas::CanvasSurface::new(ctx);
                state
                    .renderer
                    .paint_connector(&mut surface, &draw, &config, &selection)
            }
            Err(_) => {
                log::debug!("[host] re-entrant connector draw, using native");
                Outcome::Native
            }
        };
        if outcome == Outcome::Native {
            call_native();
        }
        outcome != Outcome::Native
    }
}

impl LinkFx {
    fn update<E>(&self, f: impl FnOnce(&mut EffectConfig) -> Result<(), E>) -> Result<(), E> {
        let config = {
            let mut state = self.state.borrow_mut();
            f(&mut state.config)?;
            let config = state.config;
            state.renderer.apply_config(&config);
            config
        };
        log::info!(
            "[config] effect={} mode={} gravity={}",
            config.effect.map(|e| e.name()).unwrap_or("none"),
            config.mode,
            config.gravity
        );
        self.redraw.wake();
        Ok(())
    }
}

impl Default for LinkFx {
    fn default() -> Self {
        Self::new()
    }
}
