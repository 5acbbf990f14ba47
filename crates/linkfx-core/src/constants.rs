use crate::color::Color;

// Shared simulation/sampling tuning constants used by the web and native frontends.

// Rope layout
pub const ROPE_SEGMENTS: usize = 8; // 9 mass points per connector
pub const SAG_FACTOR: f32 = 0.15; // initial sag as a fraction of connector length
pub const SAG_MAX: f32 = 60.0; // cap on initial sag, world units

// Verlet integration (per step, frame-locked)
pub const GRAVITY: f32 = 0.4; // added to y after integration
pub const DAMPING: f32 = 0.98; // velocity retained per step
pub const STIFFNESS: f32 = 0.9; // < 1.0 under-relaxes the distance constraint
pub const CONSTRAINT_ITERATIONS: usize = 4;
pub const MIN_CONSTRAINT_DIST: f32 = 1e-6; // pairs closer than this are skipped

// Endpoint motion
pub const MOMENTUM_TRANSFER: f32 = 0.6;
pub const ENDPOINT_MOVE_EPSILON: f32 = 0.1;

// A rest length this far from length/N means the connector was rebuilt, not stretched
pub const RESIZE_THRESHOLD: f32 = 20.0;

// Connectors without an id are keyed on endpoints rounded to this grid
pub const KEY_QUANTUM: f32 = 10.0;

// Rope store eviction
pub const EVICT_MIN_ENTRIES: usize = 60;
pub const SWEEP_INTERVAL_MS: f64 = 3_000.0;
pub const STALE_AFTER_MS: f64 = 8_000.0;

// Bezier control offset as a fraction of connector length (horizontal tangents)
pub const CONTROL_OFFSET_FACTOR: f32 = 0.25;

// Half-width of the central difference used for tangents
pub const TANGENT_EPSILON: f32 = 0.01;

// Clock value handed to effects in static mode: every connector shows this frame
pub const STATIC_TIME_MS: f64 = 1_000.0;

// Self-owned redraw scheduler target (~45 Hz)
pub const TARGET_FPS: f64 = 45.0;
pub const FRAME_INTERVAL_MS: f64 = 1_000.0 / TARGET_FPS;

// Rope pass styling
pub const DEFAULT_LINK_COLOR: Color = Color::rgb(0x99, 0xAA, 0x99); // host default "#9A9"
pub const ROPE_LINE_WIDTH: f32 = 2.0;
