// Host lookup and redraw wiring constants.
//
// The host (graph canvas) is usually created after this module loads, so the
// lookup is retried on a timer instead of failing at install time.

// Delay between host canvas lookups
pub const HOST_RETRY_MS: i32 = 500;
// Give up after this many lookups (~20 s)
pub const HOST_RETRY_LIMIT: u32 = 40;

// Property path from `window` to the host's graph canvas
pub const HOST_CANVAS_PATH: [&str; 2] = ["app", "canvas"];
// Method on the graph canvas that schedules a redraw: setDirty(foreground, background)
pub const HOST_SET_DIRTY: &str = "setDirty";
