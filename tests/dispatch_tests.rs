// Host-side tests for per-connector dispatch: effect, rope pass or native.

use glam::Vec2;
use linkfx_core::*;
use std::collections::HashSet;

const A: Vec2 = Vec2::new(0.0, 0.0);
const B: Vec2 = Vec2::new(100.0, 0.0);

fn link(id: i64, origin: i64, target: i64) -> LinkInfo {
    LinkInfo {
        id: Some(id),
        origin_id: Some(origin),
        target_id: Some(target),
    }
}

fn config(effect: Option<CurveEffect>, mode: AnimationMode, gravity: bool) -> EffectConfig {
    EffectConfig {
        effect,
        mode,
        gravity,
    }
}

/// Renders one connector at `now_ms`; returns the outcome, the recorded calls
/// and how often the native drawing ran.
fn render(
    renderer: &mut LinkRenderer,
    draw: &LinkDraw,
    cfg: &EffectConfig,
    selection: &dyn NodeSelection,
    now_ms: f64,
) -> (Outcome, Recorder, usize) {
    let mut rec = Recorder::new();
    let mut native_calls = 0;
    let outcome = renderer.render_connector_at(now_ms, &mut rec, draw, cfg, selection, |_| {
        native_calls += 1
    });
    (outcome, rec, native_calls)
}

/// Recorder whose arcs always fail, as a canvas would on a bad radius.
#[derive(Default)]
struct BrokenArcs {
    rec: Recorder,
}

impl Surface for BrokenArcs {
    fn save(&mut self) {
        self.rec.save()
    }
    fn restore(&mut self) {
        self.rec.restore()
    }
    fn begin_path(&mut self) {
        self.rec.begin_path()
    }
    fn move_to(&mut self, p: Vec2) {
        self.rec.move_to(p)
    }
    fn line_to(&mut self, p: Vec2) {
        self.rec.line_to(p)
    }
    fn quadratic_curve_to(&mut self, ctrl: Vec2, p: Vec2) {
        self.rec.quadratic_curve_to(ctrl, p)
    }
    fn bezier_curve_to(&mut self, c1: Vec2, c2: Vec2, p: Vec2) {
        self.rec.bezier_curve_to(c1, c2, p)
    }
    fn arc(&mut self, _center: Vec2, _radius: f32, _start: f32, _end: f32) -> SurfaceResult<()> {
        Err(SurfaceError::Unsupported("arc"))
    }
    fn stroke(&mut self) {
        self.rec.stroke()
    }
    fn fill(&mut self) {
        self.rec.fill()
    }
    fn set_stroke_color(&mut self, color: &Color) {
        self.rec.set_stroke_color(color)
    }
    fn set_fill_color(&mut self, color: &Color) {
        self.rec.set_fill_color(color)
    }
    fn set_stroke_gradient(
        &mut self,
        from: Vec2,
        to: Vec2,
        stops: &[(f32, Color)],
    ) -> SurfaceResult<()> {
        self.rec.set_stroke_gradient(from, to, stops)
    }
    fn set_line_width(&mut self, width: f32) {
        self.rec.set_line_width(width)
    }
    fn set_line_cap(&mut self, cap: LineCap) {
        self.rec.set_line_cap(cap)
    }
    fn set_global_alpha(&mut self, alpha: f32) {
        self.rec.set_global_alpha(alpha)
    }
    fn set_blend_mode(&mut self, mode: BlendMode) -> SurfaceResult<()> {
        self.rec.set_blend_mode(mode)
    }
    fn set_line_dash(&mut self, segments: &[f32]) -> SurfaceResult<()> {
        self.rec.set_line_dash(segments)
    }
    fn set_line_dash_offset(&mut self, offset: f32) {
        self.rec.set_line_dash_offset(offset)
    }
    fn set_shadow(&mut self, blur: f32, color: &Color) {
        self.rec.set_shadow(blur, color)
    }
    fn set_font(&mut self, font: &str) {
        self.rec.set_font(font)
    }
    fn fill_text(&mut self, text: &str, at: Vec2) -> SurfaceResult<()> {
        self.rec.fill_text(text, at)
    }
}

#[test]
fn nothing_configured_defers_to_native() {
    let mut renderer = LinkRenderer::new();
    let draw = LinkDraw::new(A, B).with_link(link(1, 10, 11));
    let cfg = config(None, AnimationMode::Full, false);
    let (outcome, rec, native) = render(&mut renderer, &draw, &cfg, &NoSelection, 0.0);
    assert_eq!(outcome, Outcome::Native);
    assert_eq!(native, 1);
    assert!(rec.ops.is_empty());
    assert!(renderer.ropes().is_empty());
}

#[test]
fn configured_effect_replaces_native() {
    let mut renderer = LinkRenderer::new();
    let draw = LinkDraw::new(A, B).with_link(link(1, 10, 11));
    let cfg = config(Some(CurveEffect::Flow), AnimationMode::Full, false);
    let (outcome, rec, native) = render(&mut renderer, &draw, &cfg, &NoSelection, 16.0);
    assert_eq!(outcome, Outcome::Effect);
    assert_eq!(native, 0);
    assert_eq!(rec.ops.first(), Some(&DrawOp::Save));
    assert_eq!(rec.ops.last(), Some(&DrawOp::Restore));
    assert!(rec.is_balanced());
    assert!(rec.strokes() > 0);
}

#[test]
fn malformed_endpoints_always_go_native() {
    let mut renderer = LinkRenderer::new();
    let cfg = config(Some(CurveEffect::Neon), AnimationMode::Full, true);
    for (a, b) in [
        (Vec2::new(f32::NAN, 0.0), B),
        (A, Vec2::new(0.0, f32::INFINITY)),
    ] {
        let draw = LinkDraw::new(a, b).with_link(link(1, 10, 11));
        let (outcome, rec, native) = render(&mut renderer, &draw, &cfg, &NoSelection, 0.0);
        assert_eq!(outcome, Outcome::Native);
        assert_eq!(native, 1);
        assert!(rec.ops.is_empty());
    }
    assert!(renderer.ropes().is_empty());
}

#[test]
fn gravity_without_effect_draws_the_rope() {
    let mut renderer = LinkRenderer::new();
    let draw = LinkDraw::new(A, B).with_link(link(4, 10, 11));
    let cfg = config(None, AnimationMode::Full, true);
    let (outcome, rec, native) = render(&mut renderer, &draw, &cfg, &NoSelection, 0.0);
    assert_eq!(outcome, Outcome::Rope);
    assert_eq!(native, 0);
    assert_eq!(rec.strokes(), 1);
    assert!(rec.is_balanced());
    assert!(rec.ops.contains(&DrawOp::StrokeColor(DEFAULT_LINK_COLOR)));
    assert!(rec.ops.contains(&DrawOp::LineWidth(ROPE_LINE_WIDTH)));
    assert!(rec.ops.contains(&DrawOp::MoveTo(A)));
    assert!(rec
        .ops
        .iter()
        .any(|op| matches!(op, DrawOp::QuadraticCurveTo(_, p) if *p == B)));
    assert!(renderer.ropes().contains(&ConnectorKey::Link(4)));
}

#[test]
fn rope_pass_uses_the_link_color() {
    let mut renderer = LinkRenderer::new();
    let red = Color::rgb(255, 0, 0);
    let draw = LinkDraw::new(A, B).with_color(red);
    let cfg = config(None, AnimationMode::Full, true);
    let (_, rec, _) = render(&mut renderer, &draw, &cfg, &NoSelection, 0.0);
    assert!(rec.ops.contains(&DrawOp::StrokeColor(red)));
}

#[test]
fn effect_with_gravity_follows_the_rope() {
    let mut renderer = LinkRenderer::new();
    let draw = LinkDraw::new(A, B).with_link(link(4, 10, 11));
    let cfg = config(Some(CurveEffect::Neon), AnimationMode::Full, true);
    let (outcome, rec, _) = render(&mut renderer, &draw, &cfg, &NoSelection, 0.0);
    assert_eq!(outcome, Outcome::Effect);
    assert_eq!(renderer.ropes().len(), 1);
    assert!(rec
        .ops
        .iter()
        .any(|op| matches!(op, DrawOp::QuadraticCurveTo(..))));
    assert!(!rec
        .ops
        .iter()
        .any(|op| matches!(op, DrawOp::BezierCurveTo(..))));
}

#[test]
fn selected_mode_only_animates_links_touching_the_selection() {
    let selection: HashSet<NodeId> = [5].into_iter().collect();
    let cfg = config(Some(CurveEffect::Pulse), AnimationMode::Selected, false);
    let mut renderer = LinkRenderer::new();

    let touching = LinkDraw::new(A, B).with_link(link(1, 5, 9));
    let into_it = LinkDraw::new(A, B).with_link(link(2, 9, 5));
    let elsewhere = LinkDraw::new(A, B).with_link(link(3, 3, 9));
    let preview = LinkDraw::new(A, B);

    assert_eq!(render(&mut renderer, &touching, &cfg, &selection, 0.0).0, Outcome::Effect);
    assert_eq!(render(&mut renderer, &into_it, &cfg, &selection, 0.0).0, Outcome::Effect);
    assert_eq!(render(&mut renderer, &elsewhere, &cfg, &selection, 0.0).0, Outcome::Native);
    assert_eq!(render(&mut renderer, &preview, &cfg, &selection, 0.0).0, Outcome::Effect);

    // nothing selected: everything animates
    let (outcome, _, _) = render(&mut renderer, &elsewhere, &cfg, &NoSelection, 0.0);
    assert_eq!(outcome, Outcome::Effect);
}

#[test]
fn unselected_link_still_gets_the_rope() {
    let selection: Vec<NodeId> = vec![5];
    let cfg = config(Some(CurveEffect::Pulse), AnimationMode::Selected, true);
    let mut renderer = LinkRenderer::new();
    let elsewhere = LinkDraw::new(A, B).with_link(link(3, 7, 8));
    let (outcome, _, native) = render(&mut renderer, &elsewhere, &cfg, &selection, 0.0);
    assert_eq!(outcome, Outcome::Rope);
    assert_eq!(native, 0);
}

#[test]
fn should_animate_link_by_mode() {
    let sel: [NodeId; 1] = [5];
    let l = link(1, 7, 8);
    for mode in [AnimationMode::Static, AnimationMode::Full] {
        assert!(should_animate_link(mode, &l, &sel));
    }
    assert!(!should_animate_link(AnimationMode::Selected, &l, &sel));
    assert!(should_animate_link(AnimationMode::Selected, &link(1, 5, 8), &sel));
    assert!(should_animate_link(AnimationMode::Selected, &link(1, 7, 5), &sel));
    assert!(should_animate_link(AnimationMode::Selected, &LinkInfo::default(), &sel));
    assert!(should_animate_link(AnimationMode::Selected, &l, &Vec::<NodeId>::new()));
}

#[test]
fn static_mode_freezes_the_frame() {
    let mut renderer = LinkRenderer::new();
    let draw = LinkDraw::new(A, B).with_link(link(1, 10, 11));
    let cfg = config(Some(CurveEffect::Lightning), AnimationMode::Static, false);
    let (_, early, _) = render(&mut renderer, &draw, &cfg, &NoSelection, 0.0);
    let (_, late, _) = render(&mut renderer, &draw, &cfg, &NoSelection, 98_765.0);
    assert_eq!(early.ops, late.ops);

    let full = config(Some(CurveEffect::Flow), AnimationMode::Full, false);
    let (_, t0, _) = render(&mut renderer, &draw, &full, &NoSelection, 0.0);
    let (_, t1, _) = render(&mut renderer, &draw, &full, &NoSelection, 100.0);
    assert_ne!(t0.ops, t1.ops);
}

#[test]
fn failing_effect_falls_back_to_native() {
    let mut renderer = LinkRenderer::new();
    let draw = LinkDraw::new(A, B).with_link(link(1, 10, 11));
    let cfg = config(Some(CurveEffect::Particles), AnimationMode::Full, false);
    let mut surface = BrokenArcs::default();
    let mut native = 0;
    let outcome =
        renderer.render_connector_at(0.0, &mut surface, &draw, &cfg, &NoSelection, |_| native += 1);
    assert_eq!(outcome, Outcome::Native);
    assert_eq!(native, 1);
    assert!(surface.rec.is_balanced());
}

#[test]
fn failed_effect_strokes_stay_under_the_fallback() {
    let mut renderer = LinkRenderer::new();
    let draw = LinkDraw::new(A, B).with_link(link(1, 10, 11));
    let cfg = config(Some(CurveEffect::Particles), AnimationMode::Full, false);
    let mut surface = BrokenArcs::default();
    let mut native_at = None;
    renderer.render_connector_at(0.0, &mut surface, &draw, &cfg, &NoSelection, |s| {
        native_at = Some(s.rec.ops.len())
    });
    // the base stroke went out before the first dot failed
    let native_at = native_at.expect("native drawing ran");
    assert!(surface.rec.ops[..native_at].contains(&DrawOp::Stroke));
}

#[test]
fn paint_leaves_native_drawing_to_the_caller() {
    let mut renderer = LinkRenderer::new();
    let plain = LinkDraw::new(A, B).with_link(link(1, 10, 11));
    let mut rec = Recorder::new();

    let off = config(None, AnimationMode::Full, false);
    assert_eq!(
        renderer.paint_connector_at(0.0, &mut rec, &plain, &off, &NoSelection),
        Outcome::Native
    );
    let broken = LinkDraw::new(A, Vec2::new(f32::NAN, 0.0));
    assert_eq!(
        renderer.paint_connector_at(0.0, &mut rec, &broken, &off, &NoSelection),
        Outcome::Native
    );
    assert!(rec.ops.is_empty());

    let neon = config(Some(CurveEffect::Neon), AnimationMode::Full, false);
    assert_eq!(
        renderer.paint_connector_at(0.0, &mut rec, &plain, &neon, &NoSelection),
        Outcome::Effect
    );
    assert!(rec.strokes() > 0);
    assert!(rec.is_balanced());
}

#[test]
fn failing_effect_falls_back_to_rope_when_gravity_is_on() {
    let mut renderer = LinkRenderer::new();
    let draw = LinkDraw::new(A, B).with_link(link(1, 10, 11));
    let cfg = config(Some(CurveEffect::Comet), AnimationMode::Full, true);
    let mut surface = BrokenArcs::default();
    let mut native = 0;
    let outcome =
        renderer.render_connector_at(0.0, &mut surface, &draw, &cfg, &NoSelection, |_| native += 1);
    assert_eq!(outcome, Outcome::Rope);
    assert_eq!(native, 0);
    assert!(surface.rec.is_balanced());
}

#[test]
fn preview_link_keeps_its_rope_across_jitter() {
    let mut renderer = LinkRenderer::new();
    let cfg = config(None, AnimationMode::Full, true);
    let a = Vec2::new(200.0, 100.0);
    let b = Vec2::new(400.0, 300.0);
    for frame in 0..10 {
        let jitter = Vec2::splat((frame % 3) as f32);
        let draw = LinkDraw::new(a + jitter, b - jitter);
        render(&mut renderer, &draw, &cfg, &NoSelection, frame as f64 * 16.0);
    }
    assert_eq!(renderer.ropes().len(), 1);
}

#[test]
fn switching_gravity_off_frees_ropes() {
    let mut renderer = LinkRenderer::new();
    let on = config(None, AnimationMode::Full, true);
    for id in 0..5 {
        let draw = LinkDraw::new(A, B + Vec2::Y * id as f32).with_link(link(id, 1, 2));
        render(&mut renderer, &draw, &on, &NoSelection, 0.0);
    }
    assert_eq!(renderer.ropes().len(), 5);

    let off = config(None, AnimationMode::Full, false);
    renderer.apply_config(&off);
    assert!(renderer.ropes().is_empty());
    assert!(!renderer.ropes().is_enabled());

    let draw = LinkDraw::new(A, B).with_link(link(0, 1, 2));
    let (outcome, _, native) = render(&mut renderer, &draw, &off, &NoSelection, 16.0);
    assert_eq!(outcome, Outcome::Native);
    assert_eq!(native, 1);
}
