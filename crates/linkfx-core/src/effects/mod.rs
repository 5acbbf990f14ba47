//! Connector effects.
//!
//! Each effect is a pure function of the curve and the clock: it reads
//! positions through [`CurveParams`] so it follows the rope when gravity is on,
//! derives its animation phase from `now_ms` alone, and keeps no state between
//! calls. Adding an effect means adding a variant here and a draw function in
//! one of the submodules.

mod lightning;
mod particles;
mod strokes;

use crate::curve::CurveParams;
use crate::error::{ConfigError, SurfaceResult};
use crate::surface::Surface;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveEffect {
    Flow,
    Pulse,
    Particles,
    Neon,
    Rainbow,
    Lightning,
    Comet,
    Sparkle,
    Wave,
    DataStream,
}

impl CurveEffect {
    /// Panel order; the index into this array is the configured effect index.
    pub const ALL: [CurveEffect; 10] = [
        CurveEffect::Flow,
        CurveEffect::Pulse,
        CurveEffect::Particles,
        CurveEffect::Neon,
        CurveEffect::Rainbow,
        CurveEffect::Lightning,
        CurveEffect::Comet,
        CurveEffect::Sparkle,
        CurveEffect::Wave,
        CurveEffect::DataStream,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        // declaration order matches ALL
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            CurveEffect::Flow => "flow",
            CurveEffect::Pulse => "pulse",
            CurveEffect::Particles => "particles",
            CurveEffect::Neon => "neon",
            CurveEffect::Rainbow => "rainbow",
            CurveEffect::Lightning => "lightning",
            CurveEffect::Comet => "comet",
            CurveEffect::Sparkle => "sparkle",
            CurveEffect::Wave => "wave",
            CurveEffect::DataStream => "data-stream",
        }
    }

    pub fn draw(
        self,
        surface: &mut dyn Surface,
        curve: &CurveParams,
        now_ms: f64,
    ) -> SurfaceResult<()> {
        match self {
            CurveEffect::Flow => strokes::flow(surface, curve, now_ms),
            CurveEffect::Pulse => strokes::pulse(surface, curve, now_ms),
            CurveEffect::Particles => particles::particles(surface, curve, now_ms),
            CurveEffect::Neon => strokes::neon(surface, curve, now_ms),
            CurveEffect::Rainbow => strokes::rainbow(surface, curve, now_ms),
            CurveEffect::Lightning => lightning::lightning(surface, curve, now_ms),
            CurveEffect::Comet => particles::comet(surface, curve, now_ms),
            CurveEffect::Sparkle => particles::sparkle(surface, curve, now_ms),
            CurveEffect::Wave => strokes::wave(surface, curve, now_ms),
            CurveEffect::DataStream => particles::data_stream(surface, curve, now_ms),
        }
    }
}

impl fmt::Display for CurveEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CurveEffect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownEffect(s.to_string()))
    }
}

// --- helpers shared by the effect modules ---

/// Position of `now_ms` within a repeating period, in `[0, 1)`.
#[inline]
pub(crate) fn cycle(now_ms: f64, period_ms: f64) -> f32 {
    (now_ms.rem_euclid(period_ms) / period_ms) as f32
}

/// Decoration count for a connector: one per `spacing` units, clamped.
#[inline]
pub(crate) fn count_for(length: f32, spacing: f32, min: usize, max: usize) -> usize {
    ((length / spacing) as usize).clamp(min, max)
}

/// Deterministic generator for a time bucket, so a given frame always draws
/// the same jitter.
pub(crate) fn seeded_rng(seed: u64, salt: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// 0 at both ends of the connector, 1 in the middle.
#[inline]
pub(crate) fn end_fade(t: f32) -> f32 {
    (t.clamp(0.0, 1.0) * std::f32::consts::PI).sin()
}
