//! Curve sampling shared by every effect and the rope pass.
//!
//! A connector is either the host's horizontal-tangent cubic Bezier or, while
//! gravity is on, the rope polyline from [`crate::rope`]. Both are exposed
//! through the same `t in 0..1 -> position` mapping so effects never need to
//! know which one they are drawing along.

use crate::color::Color;
use crate::constants::{CONTROL_OFFSET_FACTOR, TANGENT_EPSILON};
use crate::surface::Surface;
use glam::Vec2;
use smallvec::SmallVec;

/// Rope positions handed out by the rope store, first point = `a`.
pub type RopePoints = SmallVec<[Vec2; 16]>;

/// Horizontal control-point offset for a connector of the given length.
#[inline]
pub fn control_offset(length: f32) -> f32 {
    length * CONTROL_OFFSET_FACTOR
}

/// B(t) = (1-t)³·P0 + 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³·P3
#[inline]
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let inv = 1.0 - t;
    let inv2 = inv * inv;
    let t2 = t * t;
    inv2 * inv * p0 + 3.0 * inv2 * t * p1 + 3.0 * inv * t2 * p2 + t2 * t * p3
}

#[inline]
fn bezier_controls(a: Vec2, b: Vec2, cp: f32) -> (Vec2, Vec2) {
    (Vec2::new(a.x + cp, a.y), Vec2::new(b.x - cp, b.y))
}

/// Position at fraction `t` along the connector.
///
/// With fewer than two rope points this is the cubic Bezier; otherwise the
/// rope is walked as a polyline with equal parameter spacing per segment
/// (not equal arc length). `t` is clamped to `[0, 1]`, and the ends land
/// exactly on the first and last point.
pub fn sample_point(t: f32, a: Vec2, b: Vec2, cp: f32, rope: Option<&[Vec2]>) -> Vec2 {
    let t = t.clamp(0.0, 1.0);
    match rope {
        Some(points) if points.len() >= 2 => {
            let n = points.len();
            let scaled = t * (n - 1) as f32;
            let idx = (scaled.floor() as usize).min(n - 2);
            let local = scaled - idx as f32;
            points[idx] * (1.0 - local) + points[idx + 1] * local
        }
        _ => {
            let (c1, c2) = bezier_controls(a, b, cp);
            cubic_bezier(a, c1, c2, b, t)
        }
    }
}

/// Builds the connector path on `surface` without stroking it.
///
/// Rope points are smoothed by running quadratics through each interior point
/// to the midpoint of the following pair; the last quadratic ends on the last
/// point.
pub fn trace_curve(surface: &mut dyn Surface, a: Vec2, b: Vec2, cp: f32, rope: Option<&[Vec2]>) {
    match rope {
        Some(points) if points.len() >= 2 => {
            let n = points.len();
            surface.move_to(points[0]);
            if n == 2 {
                surface.line_to(points[1]);
                return;
            }
            for i in 1..n - 2 {
                let mid = (points[i] + points[i + 1]) * 0.5;
                surface.quadratic_curve_to(points[i], mid);
            }
            surface.quadratic_curve_to(points[n - 2], points[n - 1]);
        }
        _ => {
            let (c1, c2) = bezier_controls(a, b, cp);
            surface.move_to(a);
            surface.bezier_curve_to(c1, c2, b);
        }
    }
}

/// Begin, trace and stroke the connector with the surface's current style.
pub fn stroke_curve(surface: &mut dyn Surface, a: Vec2, b: Vec2, cp: f32, rope: Option<&[Vec2]>) {
    surface.begin_path();
    trace_curve(surface, a, b, cp, rope);
    surface.stroke();
}

/// Everything an effect needs to know about one connector for one frame.
#[derive(Clone, Copy, Debug)]
pub struct CurveParams<'a> {
    pub a: Vec2,
    pub b: Vec2,
    pub cp: f32,
    pub length: f32,
    pub rope: Option<&'a [Vec2]>,
    pub color: Color,
}

impl<'a> CurveParams<'a> {
    pub fn new(a: Vec2, b: Vec2, rope: Option<&'a [Vec2]>, color: Color) -> Self {
        let length = a.distance(b);
        Self {
            a,
            b,
            cp: control_offset(length),
            length,
            rope,
            color,
        }
    }

    #[inline]
    pub fn sample(&self, t: f32) -> Vec2 {
        sample_point(t, self.a, self.b, self.cp, self.rope)
    }

    /// Unit direction of travel at `t`, by central difference.
    pub fn tangent(&self, t: f32) -> Vec2 {
        let lo = (t - TANGENT_EPSILON).max(0.0);
        let hi = (t + TANGENT_EPSILON).min(1.0);
        (self.sample(hi) - self.sample(lo))
            .try_normalize()
            .or_else(|| (self.b - self.a).try_normalize())
            .unwrap_or(Vec2::X)
    }

    /// Left-hand normal of [`Self::tangent`].
    #[inline]
    pub fn normal(&self, t: f32) -> Vec2 {
        self.tangent(t).perp()
    }

    pub fn trace(&self, surface: &mut dyn Surface) {
        trace_curve(surface, self.a, self.b, self.cp, self.rope);
    }

    pub fn stroke(&self, surface: &mut dyn Surface) {
        stroke_curve(surface, self.a, self.b, self.cp, self.rope);
    }

    /// Sample count that keeps polyline effects smooth without over-drawing
    /// short connectors.
    pub fn sample_count(&self, spacing: f32, min: usize, max: usize) -> usize {
        ((self.length / spacing.max(1.0)).ceil() as usize).clamp(min, max)
    }
}
