//! Per-connector rope simulation.
//!
//! Every connector seen while gravity is on gets a short chain of Verlet mass
//! points whose ends are pinned to the connector's endpoints. The chain is
//! advanced by exactly one step each time it is requested, so simulation speed
//! follows the host's redraw rate.

use crate::constants::*;
use crate::curve::RopePoints;
use fnv::FnvHashMap;
use glam::Vec2;
use smallvec::SmallVec;

pub type LinkId = i64;

/// Identity of a connector across frames.
///
/// Connectors with a host id keep their rope for as long as the id lives.
/// Identity-less ones (e.g. the preview link while dragging from a slot) are
/// keyed on their endpoints snapped to a [`KEY_QUANTUM`] grid, which keeps the
/// same rope across near-identical frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectorKey {
    Link(LinkId),
    Quantized([i32; 4]),
}

impl ConnectorKey {
    pub fn for_link(id: Option<LinkId>, a: Vec2, b: Vec2) -> Self {
        match id {
            Some(id) => ConnectorKey::Link(id),
            None => Self::quantized(a, b),
        }
    }

    pub fn quantized(a: Vec2, b: Vec2) -> Self {
        let q = |v: f32| (v / KEY_QUANTUM).round() as i32;
        ConnectorKey::Quantized([q(a.x), q(a.y), q(b.x), q(b.y)])
    }
}

/// Simulation tuning. Defaults come from [`crate::constants`].
#[derive(Clone, Debug, PartialEq)]
pub struct RopeParams {
    pub segments: usize,
    pub gravity: f32,
    pub damping: f32,
    pub stiffness: f32,
    pub iterations: usize,
    pub momentum_transfer: f32,
    pub move_epsilon: f32,
    pub resize_threshold: f32,
    pub sag_factor: f32,
    pub sag_max: f32,
    pub min_constraint_dist: f32,
    pub evict_min_entries: usize,
    pub sweep_interval_ms: f64,
    pub stale_after_ms: f64,
}

impl Default for RopeParams {
    fn default() -> Self {
        Self {
            segments: ROPE_SEGMENTS,
            gravity: GRAVITY,
            damping: DAMPING,
            stiffness: STIFFNESS,
            iterations: CONSTRAINT_ITERATIONS,
            momentum_transfer: MOMENTUM_TRANSFER,
            move_epsilon: ENDPOINT_MOVE_EPSILON,
            resize_threshold: RESIZE_THRESHOLD,
            sag_factor: SAG_FACTOR,
            sag_max: SAG_MAX,
            min_constraint_dist: MIN_CONSTRAINT_DIST,
            evict_min_entries: EVICT_MIN_ENTRIES,
            sweep_interval_ms: SWEEP_INTERVAL_MS,
            stale_after_ms: STALE_AFTER_MS,
        }
    }
}

/// Verlet mass point; velocity is implied by `pos - prev`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RopePoint {
    pub pos: Vec2,
    pub prev: Vec2,
    pub pinned: bool,
}

impl RopePoint {
    fn at_rest(pos: Vec2, pinned: bool) -> Self {
        Self {
            pos,
            prev: pos,
            pinned,
        }
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.pos - self.prev
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum End {
    A,
    B,
}

#[derive(Clone, Debug)]
pub struct RopeState {
    points: SmallVec<[RopePoint; 16]>,
    segment_len: f32,
    last_a: Vec2,
    last_b: Vec2,
    last_seen_ms: f64,
}

impl RopeState {
    /// Straight line from `a` to `b` with a parabolic sag, at rest.
    pub fn new(a: Vec2, b: Vec2, length: f32, params: &RopeParams, now_ms: f64) -> Self {
        let segments = params.segments.max(1);
        let sag = (length * params.sag_factor).min(params.sag_max);
        let points = (0..=segments)
            .map(|i| {
                let t = i as f32 / segments as f32;
                let mut p = a.lerp(b, t);
                p.y += sag * 4.0 * t * (1.0 - t);
                RopePoint::at_rest(p, i == 0 || i == segments)
            })
            .collect();
        Self {
            points,
            segment_len: length / segments as f32,
            last_a: a,
            last_b: b,
            last_seen_ms: now_ms,
        }
    }

    pub fn points(&self) -> &[RopePoint] {
        &self.points
    }

    pub fn positions(&self) -> RopePoints {
        self.points.iter().map(|p| p.pos).collect()
    }

    pub fn segment_len(&self) -> f32 {
        self.segment_len
    }

    pub fn last_seen_ms(&self) -> f64 {
        self.last_seen_ms
    }

    /// One frame of simulation with the endpoints at `a` and `b`.
    pub fn step(&mut self, a: Vec2, b: Vec2, params: &RopeParams, now_ms: f64) {
        let n = self.points.len();
        if n < 2 {
            return;
        }

        let moved_a = a - self.last_a;
        if moved_a.length() > params.move_epsilon {
            self.transfer_momentum(End::A, moved_a, params);
        }
        let moved_b = b - self.last_b;
        if moved_b.length() > params.move_epsilon {
            self.transfer_momentum(End::B, moved_b, params);
        }

        self.points[0] = RopePoint::at_rest(a, true);
        self.points[n - 1] = RopePoint::at_rest(b, true);

        for p in self.points.iter_mut().filter(|p| !p.pinned) {
            let vel = p.velocity() * params.damping;
            p.prev = p.pos;
            p.pos += vel;
            p.pos.y += params.gravity;
        }

        self.relax(params);

        self.last_a = a;
        self.last_b = b;
        self.last_seen_ms = now_ms;
    }

    /// Pushes part of an endpoint's displacement into the implied velocity of
    /// the points near that end, fading quadratically over half the chain.
    /// The two halves may overlap on short ropes.
    fn transfer_momentum(&mut self, end: End, delta: Vec2, params: &RopeParams) {
        let n = self.points.len();
        let half = (n / 2).max(1);
        for k in 1..=half.min(n - 1) {
            let idx = match end {
                End::A => k,
                End::B => n - 1 - k,
            };
            let p = &mut self.points[idx];
            if p.pinned {
                continue;
            }
            let falloff = 1.0 - (k - 1) as f32 / half as f32;
            p.prev -= delta * (falloff * falloff * params.momentum_transfer);
        }
    }

    fn relax(&mut self, params: &RopeParams) {
        let rest = self.segment_len;
        for _ in 0..params.iterations {
            for i in 0..self.points.len() - 1 {
                let (p1, p2) = (self.points[i], self.points[i + 1]);
                let delta = p2.pos - p1.pos;
                let dist = delta.length();
                if dist < params.min_constraint_dist {
                    continue;
                }
                let offset = delta * ((dist - rest) / dist * 0.5 * params.stiffness);
                if !p1.pinned {
                    self.points[i].pos += offset;
                }
                if !p2.pinned {
                    self.points[i + 1].pos -= offset;
                }
            }
        }
    }
}

/// Keyed cache of rope states. Disabled stores hold nothing and hand out
/// nothing.
#[derive(Debug, Default)]
pub struct RopeStore {
    enabled: bool,
    params: RopeParams,
    ropes: FnvHashMap<ConnectorKey, RopeState>,
    last_sweep_ms: f64,
}

impl RopeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: RopeParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn params(&self) -> &RopeParams {
        &self.params
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning the simulation off drops every rope, so turning it back on
    /// starts from fresh sagging ropes.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled && !enabled {
            log::debug!("[rope] simulation off, dropping {} ropes", self.ropes.len());
            self.ropes.clear();
        }
        self.enabled = enabled;
    }

    pub fn len(&self) -> usize {
        self.ropes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ropes.is_empty()
    }

    pub fn contains(&self, key: &ConnectorKey) -> bool {
        self.ropes.contains_key(key)
    }

    pub fn get(&self, key: &ConnectorKey) -> Option<&RopeState> {
        self.ropes.get(key)
    }

    pub fn clear(&mut self) {
        self.ropes.clear();
    }

    /// Advances the rope for `key` by one step and returns its positions.
    ///
    /// Returns `None` without touching anything while the simulation is off.
    pub fn get_rope_points(
        &mut self,
        key: ConnectorKey,
        a: Vec2,
        b: Vec2,
        length: f32,
        now_ms: f64,
    ) -> Option<RopePoints> {
        if !self.enabled {
            return None;
        }
        let params = &self.params;
        let target_len = length / params.segments.max(1) as f32;
        let rope = self
            .ropes
            .entry(key)
            .and_modify(|rope| {
                if (rope.segment_len - target_len).abs() > params.resize_threshold {
                    log::debug!(
                        "[rope] {:?} resized ({:.1} -> {:.1} per segment), rebuilding",
                        key,
                        rope.segment_len,
                        target_len
                    );
                    *rope = RopeState::new(a, b, length, params, now_ms);
                }
            })
            .or_insert_with(|| RopeState::new(a, b, length, params, now_ms));
        rope.step(a, b, params, now_ms);
        let points = rope.positions();
        self.maybe_sweep(now_ms);
        Some(points)
    }

    fn maybe_sweep(&mut self, now_ms: f64) {
        if self.ropes.len() <= self.params.evict_min_entries
            || now_ms - self.last_sweep_ms < self.params.sweep_interval_ms
        {
            return;
        }
        self.last_sweep_ms = now_ms;
        let stale_after = self.params.stale_after_ms;
        let before = self.ropes.len();
        self.ropes
            .retain(|_, rope| now_ms - rope.last_seen_ms <= stale_after);
        let evicted = before - self.ropes.len();
        if evicted > 0 {
            log::debug!("[rope] evicted {} stale ropes, {} left", evicted, self.ropes.len());
        }
    }
}
