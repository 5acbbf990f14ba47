use crate::constants::FRAME_INTERVAL_MS;
use instant::Instant;

/// Milliseconds since construction; the `now` handed to animated effects.
#[derive(Clone, Copy, Debug)]
pub struct AnimationClock {
    start: Instant,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1_000.0
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Lets a redraw request through at most once per interval.
///
/// The first poll always fires. Time going backwards (clock reset) re-arms
/// the throttle instead of stalling it.
#[derive(Clone, Copy, Debug)]
pub struct RedrawThrottle {
    interval_ms: f64,
    last_fire_ms: Option<f64>,
}

impl RedrawThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            last_fire_ms: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn poll(&mut self, now_ms: f64) -> bool {
        let due = match self.last_fire_ms {
            None => true,
            Some(last) => now_ms < last || now_ms - last >= self.interval_ms,
        };
        if due {
            self.last_fire_ms = Some(now_ms);
        }
        due
    }

    pub fn reset(&mut self) {
        self.last_fire_ms = None;
    }
}

impl Default for RedrawThrottle {
    fn default() -> Self {
        Self::new(FRAME_INTERVAL_MS)
    }
}
