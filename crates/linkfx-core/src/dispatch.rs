//! Per-connector render dispatch.
//!
//! [`LinkRenderer::render_connector`] is the single entry point the host calls
//! instead of its own link drawing. It decides between the selected effect,
//! the plain rope pass and the host's native drawing, which it receives as a
//! closure.

use crate::clock::AnimationClock;
use crate::color::Color;
use crate::config::{AnimationMode, EffectConfig};
use crate::constants::{DEFAULT_LINK_COLOR, ROPE_LINE_WIDTH, STATIC_TIME_MS};
use crate::curve::{stroke_curve, CurveParams};
use crate::rope::{ConnectorKey, LinkId, RopeParams, RopeStore};
use crate::surface::{LineCap, Surface};
use glam::Vec2;
use std::collections::HashSet;
use std::hash::BuildHasher;

pub type NodeId = i64;

/// Identity of a connector as the host knows it. All fields are optional: the
/// link being dragged out of a slot has none of them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkInfo {
    pub id: Option<LinkId>,
    pub origin_id: Option<NodeId>,
    pub target_id: Option<NodeId>,
}

/// One connector draw request.
#[derive(Clone, Copy, Debug)]
pub struct LinkDraw {
    pub a: Vec2,
    pub b: Vec2,
    pub link: LinkInfo,
    /// Color the host would have used; `None` means its default.
    pub color: Option<Color>,
}

impl LinkDraw {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            a,
            b,
            link: LinkInfo::default(),
            color: None,
        }
    }

    pub fn with_link(mut self, link: LinkInfo) -> Self {
        self.link = link;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    fn is_well_formed(&self) -> bool {
        self.a.is_finite() && self.b.is_finite()
    }
}

/// The host's current node selection.
pub trait NodeSelection {
    fn is_selected(&self, id: NodeId) -> bool;
    fn is_empty(&self) -> bool;
}

impl<S: BuildHasher> NodeSelection for HashSet<NodeId, S> {
    fn is_selected(&self, id: NodeId) -> bool {
        self.contains(&id)
    }
    fn is_empty(&self) -> bool {
        HashSet::is_empty(self)
    }
}

impl NodeSelection for Vec<NodeId> {
    fn is_selected(&self, id: NodeId) -> bool {
        self.contains(&id)
    }
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<const N: usize> NodeSelection for [NodeId; N] {
    fn is_selected(&self, id: NodeId) -> bool {
        self.contains(&id)
    }
    fn is_empty(&self) -> bool {
        N == 0
    }
}

/// Nothing selected.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSelection;

impl NodeSelection for NoSelection {
    fn is_selected(&self, _id: NodeId) -> bool {
        false
    }
    fn is_empty(&self) -> bool {
        true
    }
}

/// Whether `link` gets the effect under `mode`.
///
/// In `selected` mode a link animates when it has no identity, when nothing is
/// selected, or when either of its nodes is selected. The rope pass ignores
/// this entirely.
pub fn should_animate_link(
    mode: AnimationMode,
    link: &LinkInfo,
    selection: &dyn NodeSelection,
) -> bool {
    match mode {
        AnimationMode::Static | AnimationMode::Full => true,
        AnimationMode::Selected => {
            if link.id.is_none() || selection.is_empty() {
                return true;
            }
            [link.origin_id, link.target_id]
                .into_iter()
                .flatten()
                .any(|id| selection.is_selected(id))
        }
    }
}

/// What [`LinkRenderer::render_connector`] ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The configured effect painted the connector.
    Effect,
    /// The plain rope polyline was painted.
    Rope,
    /// The host's own drawing was called.
    Native,
}

#[derive(Debug, Default)]
pub struct LinkRenderer {
    ropes: RopeStore,
    clock: AnimationClock,
}

impl LinkRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: RopeParams) -> Self {
        Self {
            ropes: RopeStore::with_params(params),
            clock: AnimationClock::new(),
        }
    }

    pub fn ropes(&self) -> &RopeStore {
        &self.ropes
    }

    /// Applies the gravity flag now rather than on the next connector, so
    /// switching it off frees the ropes immediately.
    pub fn apply_config(&mut self, config: &EffectConfig) {
        self.ropes.set_enabled(config.gravity);
    }

    pub fn render_connector<S, F>(
        &mut self,
        surface: &mut S,
        draw: &LinkDraw,
        config: &EffectConfig,
        selection: &dyn NodeSelection,
        native: F,
    ) -> Outcome
    where
        S: Surface,
        F: FnOnce(&mut S),
    {
        let now_ms = self.clock.elapsed_ms();
        self.render_connector_at(now_ms, surface, draw, config, selection, native)
    }

    /// [`Self::paint_connector_at`] on the renderer's own clock.
    pub fn paint_connector<S: Surface>(
        &mut self,
        surface: &mut S,
        draw: &LinkDraw,
        config: &EffectConfig,
        selection: &dyn NodeSelection,
    ) -> Outcome {
        let now_ms = self.clock.elapsed_ms();
        self.paint_connector_at(now_ms, surface, draw, config, selection)
    }

    /// [`Self::render_connector`] with an explicit clock value in milliseconds.
    pub fn render_connector_at<S, F>(
        &mut self,
        now_ms: f64,
        surface: &mut S,
        draw: &LinkDraw,
        config: &EffectConfig,
        selection: &dyn NodeSelection,
        native: F,
    ) -> Outcome
    where
        S: Surface,
        F: FnOnce(&mut S),
    {
        let outcome = self.paint_connector_at(now_ms, surface, draw, config, selection);
        if outcome == Outcome::Native {
            native(surface);
        }
        outcome
    }

    /// Paints the effect or rope for one connector but never the host's own
    /// drawing. On [`Outcome::Native`] the caller still owes the connector its
    /// native routine.
    ///
    /// `save`/`restore` around an effect only resets canvas state. Strokes a
    /// failing effect issued before its error stay on the canvas, and the rope
    /// or native fallback is painted over them.
    pub fn paint_connector_at<S: Surface>(
        &mut self,
        now_ms: f64,
        surface: &mut S,
        draw: &LinkDraw,
        config: &EffectConfig,
        selection: &dyn NodeSelection,
    ) -> Outcome {
        if !draw.is_well_formed() {
            return Outcome::Native;
        }

        self.ropes.set_enabled(config.gravity);
        let (a, b) = (draw.a, draw.b);
        let length = a.distance(b);
        let key = ConnectorKey::for_link(draw.link.id, a, b);
        let rope = self.ropes.get_rope_points(key, a, b, length, now_ms);
        let color = draw.color.unwrap_or(DEFAULT_LINK_COLOR);
        let curve = CurveParams::new(a, b, rope.as_deref(), color);

        let mut painted = None;
        if let Some(effect) = config.effect {
            if should_animate_link(config.mode, &draw.link, selection) {
                let t = match config.mode {
                    AnimationMode::Static => STATIC_TIME_MS,
                    _ => now_ms,
                };
                surface.save();
                let result = effect.draw(surface, &curve, t);
                surface.restore();
                match result {
                    Ok(()) => painted = Some(Outcome::Effect),
                    Err(e) => log::warn!("[fx] {} failed on {:?}: {}", effect, key, e),
                }
            }
        }

        if painted.is_none() {
            if let Some(points) = curve.rope {
                surface.save();
                surface.set_stroke_color(&color);
                surface.set_line_width(ROPE_LINE_WIDTH);
                surface.set_line_cap(LineCap::Round);
                stroke_curve(surface, a, b, curve.cp, Some(points));
                surface.restore();
                painted = Some(Outcome::Rope);
            }
        }

        painted.unwrap_or(Outcome::Native)
    }
}
