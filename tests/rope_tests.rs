// Host-side tests for the rope simulation and its keyed store.

use glam::Vec2;
use linkfx_core::*;

fn enabled_store() -> RopeStore {
    let mut store = RopeStore::new();
    store.set_enabled(true);
    store
}

fn step_once(store: &mut RopeStore, key: ConnectorKey, a: Vec2, b: Vec2, now: f64) -> RopePoints {
    store
        .get_rope_points(key, a, b, a.distance(b), now)
        .expect("store is enabled")
}

#[test]
fn disabled_store_hands_out_nothing() {
    let mut store = RopeStore::new();
    assert!(!store.is_enabled());
    let a = Vec2::ZERO;
    let b = Vec2::new(100.0, 0.0);
    assert!(store
        .get_rope_points(ConnectorKey::Link(1), a, b, 100.0, 0.0)
        .is_none());
    assert!(store.is_empty());
}

#[test]
fn new_rope_has_nine_points_and_sags_after_first_call() {
    let mut store = enabled_store();
    let a = Vec2::ZERO;
    let b = Vec2::new(100.0, 0.0);
    let points = step_once(&mut store, ConnectorKey::Link(1), a, b, 0.0);

    assert_eq!(points.len(), ROPE_SEGMENTS + 1);
    assert_eq!(points[0], a);
    assert_eq!(points[points.len() - 1], b);
    let mid = points[points.len() / 2];
    assert!(mid.y > 15.0, "midpoint should sag below the chord, got {}", mid.y);
    // pairs relax left to right, so the first step leans slightly off centre
    assert!((mid.x - 50.0).abs() < 0.5, "midpoint drifted to x={}", mid.x);
}

#[test]
fn endpoints_stay_pinned_while_dragged() {
    let mut store = enabled_store();
    let key = ConnectorKey::Link(7);
    for frame in 0..300 {
        let t = frame as f32 * 0.1;
        let a = Vec2::new(20.0 * t.sin(), 10.0 * t.cos());
        let b = Vec2::new(180.0 + 30.0 * t.cos(), 40.0 * t.sin());
        let points = step_once(&mut store, key, a, b, frame as f64 * 16.0);
        assert_eq!(points[0], a, "frame {}", frame);
        assert_eq!(points[points.len() - 1], b, "frame {}", frame);
        assert!(points.iter().all(|p| p.is_finite()));
    }
}

#[test]
fn resting_rope_settles_and_stays_put() {
    let mut store = enabled_store();
    let key = ConnectorKey::Link(1);
    let a = Vec2::ZERO;
    let b = Vec2::new(100.0, 0.0);
    for frame in 0..400 {
        step_once(&mut store, key, a, b, frame as f64 * 16.0);
    }
    let rope = store.get(&key).expect("rope exists");
    let mid = rope.points()[rope.points().len() / 2];
    assert!(mid.pos.y > 10.0 && mid.pos.y < 25.0, "settled at {}", mid.pos.y);
    for p in rope.points() {
        assert!(p.velocity().length() < 0.05, "still moving: {:?}", p);
    }
}

#[test]
fn dragged_endpoint_pushes_nearby_points_along() {
    let mut store = enabled_store();
    let key = ConnectorKey::Link(1);
    let a = Vec2::ZERO;
    let b = Vec2::new(100.0, 0.0);
    for frame in 0..400 {
        step_once(&mut store, key, a, b, frame as f64 * 16.0);
    }
    let moved = Vec2::new(30.0, 0.0);
    step_once(&mut store, key, moved, b, 400.0 * 16.0);
    let rope = store.get(&key).expect("rope exists");
    let near_a = rope.points()[1];
    assert!(near_a.velocity().x > 0.0, "point near a did not follow: {:?}", near_a);
}

#[test]
fn turning_gravity_off_drops_ropes_and_back_on_starts_fresh() {
    let a = Vec2::ZERO;
    let b = Vec2::new(100.0, 0.0);
    let key = ConnectorKey::Link(3);

    let mut fresh = enabled_store();
    let first = step_once(&mut fresh, key, a, b, 0.0);

    let mut store = enabled_store();
    for frame in 0..50 {
        step_once(&mut store, key, a, b, frame as f64 * 16.0);
    }
    store.set_enabled(false);
    assert!(store.is_empty());
    assert!(store.get_rope_points(key, a, b, 100.0, 900.0).is_none());

    store.set_enabled(true);
    let again = step_once(&mut store, key, a, b, 1_000.0);
    assert_eq!(again.as_slice(), first.as_slice());
}

#[test]
fn large_length_change_rebuilds_small_one_does_not() {
    let mut store = enabled_store();
    let key = ConnectorKey::Link(1);
    let a = Vec2::ZERO;
    step_once(&mut store, key, a, Vec2::new(100.0, 0.0), 0.0);
    assert!((store.get(&key).unwrap().segment_len() - 12.5).abs() < 1e-4);

    // 18.75 per segment: within the threshold, keeps the old rope
    step_once(&mut store, key, a, Vec2::new(150.0, 0.0), 16.0);
    assert!((store.get(&key).unwrap().segment_len() - 12.5).abs() < 1e-4);

    // 50 per segment: rebuilt
    let points = step_once(&mut store, key, a, Vec2::new(400.0, 0.0), 32.0);
    assert!((store.get(&key).unwrap().segment_len() - 50.0).abs() < 1e-4);
    assert_eq!(points[points.len() - 1], Vec2::new(400.0, 0.0));
}

#[test]
fn rebuilt_rope_matches_a_fresh_one() {
    let mut store = enabled_store();
    let key = ConnectorKey::Link(3);
    let a = Vec2::ZERO;
    for frame in 0..30 {
        step_once(&mut store, key, a, Vec2::new(100.0, 0.0), frame as f64 * 16.0);
    }
    let b = Vec2::new(400.0, 50.0);
    let rebuilt = step_once(&mut store, key, a, b, 480.0);

    let mut fresh_store = enabled_store();
    let fresh = step_once(&mut fresh_store, key, a, b, 0.0);
    assert_eq!(rebuilt.as_slice(), fresh.as_slice());
    assert!(store
        .get(&key)
        .unwrap()
        .points()
        .iter()
        .zip(fresh_store.get(&key).unwrap().points())
        .all(|(p, q)| p.velocity() == q.velocity()));
}

#[test]
fn stale_ropes_are_evicted_once_the_store_is_large() {
    let mut store = enabled_store();
    let t0 = 10_000.0;
    for i in 0..61 {
        let a = Vec2::new(0.0, i as f32 * 50.0);
        step_once(&mut store, ConnectorKey::Link(i), a, a + Vec2::new(100.0, 0.0), t0);
    }
    assert_eq!(store.len(), 61);

    let a = Vec2::new(0.0, -500.0);
    step_once(&mut store, ConnectorKey::Link(1_000), a, a + Vec2::X * 100.0, t0 + 8_001.0);
    assert_eq!(store.len(), 1);
    assert!(store.contains(&ConnectorKey::Link(1_000)));
}

#[test]
fn small_stores_are_never_swept() {
    let mut store = enabled_store();
    for i in 0..60 {
        let a = Vec2::new(0.0, i as f32 * 50.0);
        step_once(&mut store, ConnectorKey::Link(i), a, a + Vec2::X * 100.0, 0.0);
    }
    let a = Vec2::new(0.0, 0.0);
    step_once(&mut store, ConnectorKey::Link(0), a, a + Vec2::X * 100.0, 60_000.0);
    assert_eq!(store.len(), 60);
}

#[test]
fn recently_seen_ropes_survive_a_sweep() {
    let mut store = enabled_store();
    for i in 0..70 {
        let a = Vec2::new(0.0, i as f32 * 50.0);
        // half of them seen late
        let now = if i % 2 == 0 { 0.0 } else { 5_000.0 };
        step_once(&mut store, ConnectorKey::Link(i), a, a + Vec2::X * 100.0, now);
    }
    let a = Vec2::new(0.0, 0.0);
    step_once(&mut store, ConnectorKey::Link(0), a, a + Vec2::X * 100.0, 12_000.0);
    assert_eq!(store.len(), 36);
    assert!(store.contains(&ConnectorKey::Link(0)));
    assert!(store.contains(&ConnectorKey::Link(1)));
    assert!(!store.contains(&ConnectorKey::Link(2)));
}

#[test]
fn step_records_when_the_rope_was_last_seen() {
    let mut store = enabled_store();
    let key = ConnectorKey::Link(1);
    step_once(&mut store, key, Vec2::ZERO, Vec2::X * 100.0, 5.0);
    step_once(&mut store, key, Vec2::ZERO, Vec2::X * 100.0, 42.0);
    assert_eq!(store.get(&key).unwrap().last_seen_ms(), 42.0);
}

#[test]
fn quantized_keys_absorb_small_jitter() {
    let a = Vec2::new(100.0, 200.0);
    let b = Vec2::new(300.0, 400.0);
    let k1 = ConnectorKey::quantized(a, b);
    let k2 = ConnectorKey::quantized(a + Vec2::new(2.0, 2.0), b - Vec2::new(3.0, 1.0));
    assert_eq!(k1, k2);
    assert_ne!(k1, ConnectorKey::quantized(a + Vec2::new(30.0, 0.0), b));

    assert_eq!(ConnectorKey::for_link(Some(5), a, b), ConnectorKey::Link(5));
    assert_eq!(
        ConnectorKey::for_link(Some(5), a, b),
        ConnectorKey::for_link(Some(5), a * 3.0, b * 3.0)
    );
    assert_eq!(ConnectorKey::for_link(None, a, b), k1);
}

#[test]
fn custom_params_change_the_chain() {
    let params = RopeParams {
        segments: 4,
        ..RopeParams::default()
    };
    let mut store = RopeStore::with_params(params);
    store.set_enabled(true);
    let points = step_once(&mut store, ConnectorKey::Link(1), Vec2::ZERO, Vec2::X * 80.0, 0.0);
    assert_eq!(points.len(), 5);
}
