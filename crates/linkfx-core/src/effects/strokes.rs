//! Effects made only of stroked passes along the curve.

use super::{cycle, end_fade};
use crate::color::Color;
use crate::curve::CurveParams;
use crate::error::SurfaceResult;
use crate::surface::{BlendMode, LineCap, Surface};
use std::f32::consts::TAU;

const FLOW_DASH: [f32; 2] = [10.0, 8.0];
const FLOW_SPEED: f64 = 0.05; // dash units per ms

/// Base stroke brightening towards `b`, with dashes marching from `a` to `b`.
pub(super) fn flow(s: &mut dyn Surface, curve: &CurveParams, now_ms: f64) -> SurfaceResult<()> {
    s.set_line_cap(LineCap::Round);
    s.set_stroke_gradient(
        curve.a,
        curve.b,
        &[(0.0, curve.color.with_alpha(0.2)), (1.0, curve.color.with_alpha(0.5))],
    )?;
    s.set_line_width(4.0);
    curve.stroke(s);

    let period: f32 = FLOW_DASH.iter().sum();
    let offset = ((now_ms * FLOW_SPEED) as f32).rem_euclid(period);
    s.set_line_dash(&FLOW_DASH)?;
    s.set_line_dash_offset(-offset);
    s.set_stroke_color(&curve.color.mix(Color::WHITE, 0.3));
    s.set_line_width(2.0);
    curve.stroke(s);
    s.set_line_dash(&[])
}

/// Glow that breathes in width, alpha and blur.
pub(super) fn pulse(s: &mut dyn Surface, curve: &CurveParams, now_ms: f64) -> SurfaceResult<()> {
    let breath = 0.5 + 0.5 * (cycle(now_ms, 1_200.0) * TAU).sin();
    s.set_line_cap(LineCap::Round);
    s.set_shadow(6.0 + 10.0 * breath, &curve.color);
    s.set_global_alpha(0.5 + 0.5 * breath);
    s.set_stroke_color(&curve.color);
    s.set_line_width(2.0 + 3.0 * breath);
    curve.stroke(s);

    s.set_shadow(0.0, &curve.color);
    s.set_global_alpha(1.0);
    s.set_stroke_color(&curve.color.mix(Color::WHITE, 0.6));
    s.set_line_width(1.0);
    curve.stroke(s);
    Ok(())
}

/// Halo, glow and hot core, added on top of whatever is below.
pub(super) fn neon(s: &mut dyn Surface, curve: &CurveParams, now_ms: f64) -> SurfaceResult<()> {
    let flicker = 0.9 + 0.1 * ((now_ms * 0.02) as f32).sin();
    s.set_blend_mode(BlendMode::Lighter)?;
    s.set_line_cap(LineCap::Round);
    let passes = [
        (10.0, 0.12 * flicker, curve.color),
        (5.0, 0.3 * flicker, curve.color),
        (1.5, 1.0, curve.color.mix(Color::WHITE, 0.8)),
    ];
    for (width, alpha, color) in passes {
        s.set_stroke_color(&color.with_alpha(alpha));
        s.set_line_width(width);
        curve.stroke(s);
    }
    s.set_blend_mode(BlendMode::SourceOver)
}

/// Short sub-segments whose hue runs along the curve and drifts over time.
pub(super) fn rainbow(s: &mut dyn Surface, curve: &CurveParams, now_ms: f64) -> SurfaceResult<()> {
    let n = curve.sample_count(6.0, 12, 96);
    let drift = cycle(now_ms, 3_000.0) * 360.0;
    s.set_line_cap(LineCap::Round);
    s.set_line_width(3.0);
    let mut prev = curve.sample(0.0);
    for i in 0..n {
        let t1 = (i + 1) as f32 / n as f32;
        let next = curve.sample(t1);
        let hue = (i as f32 / n as f32) * 360.0 + drift;
        s.set_stroke_color(&Color::from_hsl(hue, 0.9, 0.6));
        s.begin_path();
        s.move_to(prev);
        s.line_to(next);
        s.stroke();
        prev = next;
    }
    Ok(())
}

/// A travelling sine wrapped around the curve, pinned to zero at both ends.
pub(super) fn wave(s: &mut dyn Surface, curve: &CurveParams, now_ms: f64) -> SurfaceResult<()> {
    s.set_line_cap(LineCap::Round);
    s.set_stroke_color(&curve.color.with_alpha(0.25));
    s.set_line_width(1.5);
    curve.stroke(s);

    let amplitude = (curve.length * 0.05).min(6.0);
    let wavelength = 40.0_f32;
    let cycles = (curve.length / wavelength).max(1.0);
    let phase = cycle(now_ms, 900.0) * TAU;
    let n = curve.sample_count(4.0, 16, 160);

    s.set_stroke_color(&curve.color.mix(Color::WHITE, 0.2));
    s.set_line_width(2.0);
    s.begin_path();
    for i in 0..=n {
        let t = i as f32 / n as f32;
        let swing = (t * cycles * TAU - phase).sin() * amplitude * end_fade(t);
        let p = curve.sample(t) + curve.normal(t) * swing;
        if i == 0 {
            s.move_to(p);
        } else {
            s.line_to(p);
        }
    }
    s.stroke();
    Ok(())
}
