use crate::constants::{HOST_CANVAS_PATH, HOST_RETRY_LIMIT, HOST_RETRY_MS, HOST_SET_DIRTY};
use anyhow::{anyhow, bail, Result};
use glam::Vec2;
use js_sys::{Array, Function, Object, Reflect};
use linkfx_core::{LinkInfo, NodeId, NodeSelection};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

// ---------------- Reading host values ----------------

/// `[x, y]` from anything indexable (Array, Float32Array). `None` for
/// missing or non-numeric coordinates.
pub fn point_from_js(value: &JsValue) -> Option<Vec2> {
    if !value.is_object() {
        return None;
    }
    let x = Reflect::get_u32(value, 0).ok()?.as_f64()?;
    let y = Reflect::get_u32(value, 1).ok()?.as_f64()?;
    Some(Vec2::new(x as f32, y as f32))
}

fn number_field(obj: &JsValue, name: &str) -> Option<i64> {
    let v = Reflect::get(obj, &JsValue::from_str(name)).ok()?.as_f64()?;
    v.is_finite().then_some(v as i64)
}

/// Link identity from the host's link object; a null link has none.
pub fn link_from_js(value: &JsValue) -> LinkInfo {
    if !value.is_object() {
        return LinkInfo::default();
    }
    LinkInfo {
        id: number_field(value, "id"),
        origin_id: number_field(value, "origin_id"),
        target_id: number_field(value, "target_id"),
    }
}

/// The host's selected nodes: either an object keyed by node id or an array
/// of ids.
pub struct JsSelection<'a>(pub &'a JsValue);

impl NodeSelection for JsSelection<'_> {
    fn is_selected(&self, id: NodeId) -> bool {
        if Array::is_array(self.0) {
            let ids: &Array = self.0.unchecked_ref();
            return ids.includes(&JsValue::from_f64(id as f64), 0);
        }
        self.0.is_object()
            && Reflect::has(self.0, &JsValue::from_str(&id.to_string())).unwrap_or(false)
    }

    fn is_empty(&self) -> bool {
        if Array::is_array(self.0) {
            return self.0.unchecked_ref::<Array>().length() == 0;
        }
        !self.0.is_object() || Object::keys(self.0.unchecked_ref()).length() == 0
    }
}

// ---------------- Host canvas ----------------

pub fn find_host_canvas() -> Result<JsValue> {
    let mut cur: JsValue = web::window().ok_or_else(|| anyhow!("no window"))?.into();
    for key in HOST_CANVAS_PATH {
        cur = Reflect::get(&cur, &JsValue::from_str(key))
            .map_err(|e| anyhow!("reading `{}` threw: {:?}", key, e))?;
        if cur.is_undefined() || cur.is_null() {
            bail!("`{}` is not set yet", key);
        }
    }
    Ok(cur)
}

/// Asks the host to redraw both canvas layers.
pub fn set_dirty(canvas: &JsValue) {
    let method = Reflect::get(canvas, &JsValue::from_str(HOST_SET_DIRTY))
        .ok()
        .and_then(|m| m.dyn_into::<Function>().ok());
    match method {
        Some(f) => {
            if let Err(e) = f.call2(canvas, &JsValue::TRUE, &JsValue::TRUE) {
                log::warn!("[host] {} threw: {:?}", HOST_SET_DIRTY, e);
            }
        }
        None => log::debug!("[host] canvas has no {}", HOST_SET_DIRTY),
    }
}

/// Looks the host canvas up, retrying on a timer until it exists or the retry
/// budget runs out. `found` runs once with the canvas.
pub fn attach_with_retry(found: impl FnOnce(JsValue) + 'static) {
    try_attach(Box::new(found), 0);
}

fn try_attach(found: Box<dyn FnOnce(JsValue)>, attempt: u32) {
    let err = match find_host_canvas() {
        Ok(canvas) => {
            log::info!("[host] graph canvas found after {} retries", attempt);
            found(canvas);
            return;
        }
        Err(e) => e,
    };
    if attempt >= HOST_RETRY_LIMIT {
        log::warn!("[host] giving up after {} tries: {}", attempt + 1, err);
        return;
    }
    log::debug!("[host] graph canvas not ready (attempt {}): {}", attempt + 1, err);
    let Some(window) = web::window() else {
        return;
    };
    let retry = Closure::once_into_js(move || try_attach(found, attempt + 1));
    if let Err(e) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(retry.unchecked_ref(), HOST_RETRY_MS)
    {
        log::warn!("[host] setTimeout failed: {:?}", e);
    }
}
