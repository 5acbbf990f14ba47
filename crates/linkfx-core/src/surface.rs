//! Drawing surface abstraction.
//!
//! [`Surface`] is the slice of the 2D canvas API that the effects and the rope
//! pass need. The web frontend implements it over `CanvasRenderingContext2d`;
//! [`Recorder`] captures the calls for tests and the native harness.
//!
//! Calls that can throw on a real canvas (arcs with bad radii, dash arrays,
//! composite modes, gradients, text) return [`SurfaceResult`]; path building
//! and plain style setters cannot fail.

use crate::color::Color;
use crate::error::SurfaceResult;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    SourceOver,
    Lighter,
    Screen,
}

impl BlendMode {
    pub fn as_css(self) -> &'static str {
        match self {
            BlendMode::SourceOver => "source-over",
            BlendMode::Lighter => "lighter",
            BlendMode::Screen => "screen",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
}

impl LineCap {
    pub fn as_css(self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
        }
    }
}

pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);

    fn begin_path(&mut self);
    fn move_to(&mut self, p: Vec2);
    fn line_to(&mut self, p: Vec2);
    fn quadratic_curve_to(&mut self, ctrl: Vec2, p: Vec2);
    fn bezier_curve_to(&mut self, c1: Vec2, c2: Vec2, p: Vec2);
    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32) -> SurfaceResult<()>;
    fn stroke(&mut self);
    fn fill(&mut self);

    fn set_stroke_color(&mut self, color: &Color);
    fn set_fill_color(&mut self, color: &Color);
    /// Linear gradient from `from` to `to`; `stops` are `(offset 0..1, color)`.
    fn set_stroke_gradient(
        &mut self,
        from: Vec2,
        to: Vec2,
        stops: &[(f32, Color)],
    ) -> SurfaceResult<()>;
    fn set_line_width(&mut self, width: f32);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_blend_mode(&mut self, mode: BlendMode) -> SurfaceResult<()>;
    fn set_line_dash(&mut self, segments: &[f32]) -> SurfaceResult<()>;
    fn set_line_dash_offset(&mut self, offset: f32);
    fn set_shadow(&mut self, blur: f32, color: &Color);

    fn set_font(&mut self, font: &str);
    fn fill_text(&mut self, text: &str, at: Vec2) -> SurfaceResult<()>;

    /// Full circle, filled with the current fill style.
    fn fill_circle(&mut self, center: Vec2, radius: f32) -> SurfaceResult<()> {
        self.begin_path();
        self.arc(center, radius, 0.0, std::f32::consts::TAU)?;
        self.fill();
        Ok(())
    }
}

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    BeginPath,
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadraticCurveTo(Vec2, Vec2),
    BezierCurveTo(Vec2, Vec2, Vec2),
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
    },
    Stroke,
    Fill,
    StrokeColor(Color),
    FillColor(Color),
    StrokeGradient {
        from: Vec2,
        to: Vec2,
        stops: Vec<(f32, Color)>,
    },
    LineWidth(f32),
    LineCap(LineCap),
    GlobalAlpha(f32),
    Blend(BlendMode),
    LineDash(Vec<f32>),
    LineDashOffset(f32),
    Shadow { blur: f32, color: Color },
    Font(String),
    FillText(String, Vec2),
}

/// Surface that records every call instead of drawing.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    pub fn strokes(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Stroke))
    }

    pub fn fills(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Fill))
    }

    /// Every position the recorded path calls touched, control points included.
    pub fn path_points(&self) -> Vec<Vec2> {
        let mut out = Vec::new();
        for op in &self.ops {
            match op {
                DrawOp::MoveTo(p) | DrawOp::LineTo(p) => out.push(*p),
                DrawOp::QuadraticCurveTo(c, p) => out.extend([*c, *p]),
                DrawOp::BezierCurveTo(c1, c2, p) => out.extend([*c1, *c2, *p]),
                DrawOp::Arc { center, .. } => out.push(*center),
                DrawOp::FillText(_, p) => out.push(*p),
                _ => {}
            }
        }
        out
    }

    /// True when every save has a matching restore, in order.
    pub fn is_balanced(&self) -> bool {
        let mut depth = 0i32;
        for op in &self.ops {
            match op {
                DrawOp::Save => depth += 1,
                DrawOp::Restore => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }
}

impl Surface for Recorder {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }
    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }
    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }
    fn move_to(&mut self, p: Vec2) {
        self.ops.push(DrawOp::MoveTo(p));
    }
    fn line_to(&mut self, p: Vec2) {
        self.ops.push(DrawOp::LineTo(p));
    }
    fn quadratic_curve_to(&mut self, ctrl: Vec2, p: Vec2) {
        self.ops.push(DrawOp::QuadraticCurveTo(ctrl, p));
    }
    fn bezier_curve_to(&mut self, c1: Vec2, c2: Vec2, p: Vec2) {
        self.ops.push(DrawOp::BezierCurveTo(c1, c2, p));
    }
    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32) -> SurfaceResult<()> {
        self.ops.push(DrawOp::Arc {
            center,
            radius,
            start,
            end,
        });
        Ok(())
    }
    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }
    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }
    fn set_stroke_color(&mut self, color: &Color) {
        self.ops.push(DrawOp::StrokeColor(*color));
    }
    fn set_fill_color(&mut self, color: &Color) {
        self.ops.push(DrawOp::FillColor(*color));
    }
    fn set_stroke_gradient(
        &mut self,
        from: Vec2,
        to: Vec2,
        stops: &[(f32, Color)],
    ) -> SurfaceResult<()> {
        self.ops.push(DrawOp::StrokeGradient {
            from,
            to,
            stops: stops.to_vec(),
        });
        Ok(())
    }
    fn set_line_width(&mut self, width: f32) {
        self.ops.push(DrawOp::LineWidth(width));
    }
    fn set_line_cap(&mut self, cap: LineCap) {
        self.ops.push(DrawOp::LineCap(cap));
    }
    fn set_global_alpha(&mut self, alpha: f32) {
        self.ops.push(DrawOp::GlobalAlpha(alpha));
    }
    fn set_blend_mode(&mut self, mode: BlendMode) -> SurfaceResult<()> {
        self.ops.push(DrawOp::Blend(mode));
        Ok(())
    }
    fn set_line_dash(&mut self, segments: &[f32]) -> SurfaceResult<()> {
        self.ops.push(DrawOp::LineDash(segments.to_vec()));
        Ok(())
    }
    fn set_line_dash_offset(&mut self, offset: f32) {
        self.ops.push(DrawOp::LineDashOffset(offset));
    }
    fn set_shadow(&mut self, blur: f32, color: &Color) {
        self.ops.push(DrawOp::Shadow {
            blur,
            color: *color,
        });
    }
    fn set_font(&mut self, font: &str) {
        self.ops.push(DrawOp::Font(font.to_string()));
    }
    fn fill_text(&mut self, text: &str, at: Vec2) -> SurfaceResult<()> {
        self.ops.push(DrawOp::FillText(text.to_string(), at));
        Ok(())
    }
}
