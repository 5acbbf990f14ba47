//! Flickering bolt drawn as a jittered polyline along the curve.

use super::{end_fade, seeded_rng};
use crate::color::Color;
use crate::curve::CurveParams;
use crate::error::SurfaceResult;
use crate::surface::{BlendMode, LineCap, Surface};
use glam::Vec2;
use rand::Rng;

/// Bolt shape is re-rolled this often.
const BOLT_FLIP_MS: f64 = 70.0;
const FORK_CHANCE: f64 = 0.35;

/// Jagged bolt hugging the curve with an occasional fork. The jitter is seeded
/// from the time bucket, so a frame redrawn at the same time is identical.
pub(super) fn lightning(
    s: &mut dyn Surface,
    curve: &CurveParams,
    now_ms: f64,
) -> SurfaceResult<()> {
    let bucket = (now_ms / BOLT_FLIP_MS).floor().max(0.0) as u64;
    let mut rng = seeded_rng(bucket, 3);
    let amplitude = (4.0 + curve.length * 0.03).min(10.0);
    let n = curve.sample_count(14.0, 6, 40);

    let bolt: Vec<Vec2> = (0..=n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let jitter = rng.gen_range(-1.0f32..1.0) * amplitude * end_fade(t);
            curve.sample(t) + curve.normal(t) * jitter
        })
        .collect();

    let fork = if rng.gen_bool(FORK_CHANCE) && n > 2 {
        let from = rng.gen_range(1..n - 1);
        let t = from as f32 / n as f32;
        let bend = rng.gen_range(-1.2f32..1.2);
        let dir = (curve.tangent(t) + curve.normal(t) * bend).normalize_or_zero();
        let reach = rng.gen_range(8.0f32..20.0);
        Some((bolt[from], bolt[from] + dir * reach))
    } else {
        None
    };

    let glow = curve.color.mix(Color::rgb(150, 200, 255), 0.6);
    s.set_blend_mode(BlendMode::Lighter)?;
    s.set_line_cap(LineCap::Round);
    let passes = [(3.5, glow.with_alpha(0.5), 12.0), (1.2, Color::WHITE, 0.0)];
    for (width, color, blur) in passes {
        s.set_shadow(blur, &glow);
        s.set_stroke_color(&color);
        s.set_line_width(width);
        s.begin_path();
        s.move_to(bolt[0]);
        for p in &bolt[1..] {
            s.line_to(*p);
        }
        if let Some((start, end)) = fork {
            s.move_to(start);
            s.line_to(end);
        }
        s.stroke();
    }
    s.set_shadow(0.0, &glow);
    s.set_blend_mode(BlendMode::SourceOver)
}
