use anyhow::{bail, Result};
use glam::Vec2;
use linkfx_core::{
    AnimationMode, ConnectorKey, CurveEffect, EffectConfig, LinkDraw, LinkInfo, LinkRenderer, NoSelection,
    Outcome, Recorder, FRAME_INTERVAL_MS,
};

const FRAMES: usize = 90;

/// A few connectors laid out like a small graph; the first one has its target
/// dragged around in a circle.
fn scene(frame: usize) -> Vec<LinkDraw> {
    let t = frame as f32 * 0.08;
    let dragged = Vec2::new(420.0, 160.0) + Vec2::new(t.cos(), t.sin()) * 60.0;
    let link = |id: i64, origin: i64, target: i64| LinkInfo {
        id: Some(id),
        origin_id: Some(origin),
        target_id: Some(target),
    };
    vec![
        LinkDraw::new(Vec2::new(100.0, 100.0), dragged).with_link(link(1, 10, 11)),
        LinkDraw::new(Vec2::new(100.0, 220.0), Vec2::new(380.0, 300.0)).with_link(link(2, 10, 12)),
        LinkDraw::new(Vec2::new(420.0, 300.0), Vec2::new(700.0, 180.0)).with_link(link(3, 12, 13)),
        // preview link while dragging from a slot: no identity
        LinkDraw::new(Vec2::new(700.0, 220.0), Vec2::new(760.0 + t * 10.0, 320.0)),
    ]
}

#[derive(Default)]
struct Tally {
    ops: usize,
    strokes: usize,
    fills: usize,
    native: usize,
}

fn run(renderer: &mut LinkRenderer, config: &EffectConfig) -> Result<Tally> {
    let mut tally = Tally::default();
    renderer.apply_config(config);
    for frame in 0..FRAMES {
        let now_ms = frame as f64 * FRAME_INTERVAL_MS;
        for draw in scene(frame) {
            let mut rec = Recorder::new();
            let outcome =
                renderer.render_connector_at(now_ms, &mut rec, &draw, config, &NoSelection, |_| {});
            if !rec.is_balanced() {
                bail!("unbalanced save/restore from {:?} on frame {}", config.effect, frame);
            }
            if outcome == Outcome::Native {
                tally.native += 1;
            }
            tally.ops += rec.ops.len();
            tally.strokes += rec.strokes();
            tally.fills += rec.fills();
        }
    }
    Ok(tally)
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    log::info!("linkfx-native: {} frames per configuration", FRAMES);

    for gravity in [false, true] {
        let mut renderer = LinkRenderer::new();
        for effect in std::iter::once(None).chain(CurveEffect::ALL.into_iter().map(Some)) {
            let config = EffectConfig {
                effect,
                mode: AnimationMode::Full,
                gravity,
            };
            let t = run(&mut renderer, &config)?;
            log::info!(
                "gravity={:<5} effect={:<12} ops={:>6} strokes={:>5} fills={:>5} native={:>3} ropes={}",
                gravity,
                effect.map(|e| e.name()).unwrap_or("none"),
                t.ops,
                t.strokes,
                t.fills,
                t.native,
                renderer.ropes().len()
            );
        }
    }

    let mut renderer = LinkRenderer::new();
    let config = EffectConfig {
        gravity: true,
        ..EffectConfig::default()
    };
    renderer.apply_config(&config);
    for frame in 0..FRAMES {
        let now_ms = frame as f64 * FRAME_INTERVAL_MS;
        let draw = scene(frame)[1];
        let mut rec = Recorder::new();
        renderer.render_connector_at(now_ms, &mut rec, &draw, &config, &NoSelection, |_| {});
    }
    if let Some(rope) = renderer.ropes().get(&ConnectorKey::Link(2)) {
        let mid = rope.points()[rope.points().len() / 2].pos;
        log::info!("settled rope 2 midpoint: ({:.2}, {:.2})", mid.x, mid.y);
    }
    Ok(())
}
