//! Effects that place moving or twinkling decorations at sampled fractions.

use super::{count_for, cycle, end_fade, seeded_rng};
use crate::color::Color;
use crate::constants::KEY_QUANTUM;
use crate::curve::CurveParams;
use crate::error::SurfaceResult;
use crate::surface::{BlendMode, LineCap, Surface};
use glam::Vec2;
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// Dots travelling from `a` to `b`, one per ~40 units of connector.
pub(super) fn particles(
    s: &mut dyn Surface,
    curve: &CurveParams,
    now_ms: f64,
) -> SurfaceResult<()> {
    s.set_stroke_color(&curve.color.with_alpha(0.25));
    s.set_line_width(1.5);
    curve.stroke(s);

    let count = count_for(curve.length, 40.0, 3, 24);
    let head = cycle(now_ms, 2_000.0);
    s.set_shadow(6.0, &curve.color);
    s.set_fill_color(&curve.color.mix(Color::WHITE, 0.5));
    for i in 0..count {
        let t = (head + i as f32 / count as f32).fract();
        let radius = 1.5 + 1.5 * end_fade(t);
        s.fill_circle(curve.sample(t), radius)?;
    }
    s.set_shadow(0.0, &curve.color);
    Ok(())
}

const COMET_TAIL: usize = 14;
const COMET_TAIL_SPAN: f32 = 0.12;

/// Bright heads with tails that thin out behind them. Tails do not wrap past `a`.
pub(super) fn comet(s: &mut dyn Surface, curve: &CurveParams, now_ms: f64) -> SurfaceResult<()> {
    let heads = count_for(curve.length, 300.0, 1, 3);
    let lead = cycle(now_ms, 1_600.0);
    let tint = curve.color.mix(Color::rgb(255, 220, 150), 0.5);
    for h in 0..heads {
        let t_head = (lead + h as f32 / heads as f32).fract();
        for k in (0..COMET_TAIL).rev() {
            let falloff = 1.0 - k as f32 / COMET_TAIL as f32;
            let t = t_head - COMET_TAIL_SPAN * k as f32 / COMET_TAIL as f32;
            if t < 0.0 {
                continue;
            }
            s.set_fill_color(&tint.with_alpha(falloff * falloff));
            s.fill_circle(curve.sample(t), 0.6 + 2.8 * falloff)?;
        }
        s.set_shadow(10.0, &tint);
        s.set_fill_color(&Color::WHITE);
        s.fill_circle(curve.sample(t_head), 3.0)?;
        s.set_shadow(0.0, &tint);
    }
    Ok(())
}

/// Four-point stars twinkling at fixed spots along a dim curve.
pub(super) fn sparkle(s: &mut dyn Surface, curve: &CurveParams, now_ms: f64) -> SurfaceResult<()> {
    s.set_stroke_color(&curve.color.with_alpha(0.3));
    s.set_line_width(1.0);
    curve.stroke(s);

    let count = count_for(curve.length, 30.0, 4, 32);
    // seeded from the length in whole key quanta, so spots hold still while
    // the clock runs and through sub-pixel drags
    let mut rng = seeded_rng((curve.length / KEY_QUANTUM).round() as u64, 7);
    let gold = Color::rgb(255, 236, 170);
    s.set_blend_mode(BlendMode::Screen)?;
    for i in 0..count {
        let slot = (i as f32 + rng.gen_range(0.2..0.8)) / count as f32;
        let drift = rng.gen_range(-4.0f32..4.0);
        let phase = rng.gen_range(0.0..TAU);
        let twinkle = ((now_ms * 0.004) as f32 + phase).sin();
        if twinkle <= 0.05 {
            continue;
        }
        let center = curve.sample(slot) + curve.normal(slot) * drift;
        s.set_fill_color(&gold.with_alpha(twinkle));
        star(s, center, 1.0 + 3.0 * twinkle, (now_ms * 0.001) as f32 + phase);
    }
    s.set_blend_mode(BlendMode::SourceOver)
}

fn star(s: &mut dyn Surface, center: Vec2, radius: f32, spin: f32) {
    s.begin_path();
    for k in 0..8 {
        let r = if k % 2 == 0 { radius } else { radius * 0.3 };
        let p = center + Vec2::from_angle(spin + k as f32 * PI / 4.0) * r;
        if k == 0 {
            s.move_to(p);
        } else {
            s.line_to(p);
        }
    }
    s.fill();
}

const GLYPH_FLIP_MS: f64 = 250.0;

/// `0`/`1` glyphs streaming along a dotted base line.
pub(super) fn data_stream(
    s: &mut dyn Surface,
    curve: &CurveParams,
    now_ms: f64,
) -> SurfaceResult<()> {
    s.set_line_cap(LineCap::Butt);
    s.set_line_dash(&[2.0, 6.0])?;
    s.set_stroke_color(&curve.color.with_alpha(0.4));
    s.set_line_width(1.0);
    curve.stroke(s);
    s.set_line_dash(&[])?;

    let count = count_for(curve.length, 18.0, 3, 48);
    let head = cycle(now_ms, 3_000.0);
    let bucket = (now_ms / GLYPH_FLIP_MS).floor().max(0.0) as u64;
    let mut rng = seeded_rng(bucket, 11);
    let green = Color::rgb(120, 255, 140);
    s.set_font("10px monospace");
    for i in 0..count {
        let t = (head + i as f32 / count as f32).fract();
        let glyph = if rng.gen_bool(0.5) { "1" } else { "0" };
        s.set_fill_color(&green.with_alpha(0.2 + 0.8 * end_fade(t)));
        s.fill_text(glyph, curve.sample(t) + Vec2::new(-3.0, 3.5))?;
    }
    Ok(())
}
