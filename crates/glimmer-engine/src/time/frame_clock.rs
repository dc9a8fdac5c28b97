use std::time::{Duration, Instant};

/// Weight of the newest sample in the smoothed frame time.
const SMOOTHING: f32 = 0.1;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Clamped time since the previous tick, in seconds.
    pub dt: f32,

    /// Exponentially smoothed unclamped frame time, in milliseconds.
    pub smoothed_ms: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Frames per second implied by the smoothed frame time.
    pub fn fps(&self) -> f32 {
        if self.smoothed_ms > 0.0 { 1000.0 / self.smoothed_ms } else { 0.0 }
    }
}

/// Frame clock producing `FrameTime` snapshots.
///
/// `dt` is clamped so a debugger pause or a minimized window does not make a
/// light orbit jump across the scene on resume. The smoothed readout uses the
/// raw delta so stalls still show up in it.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    smoothed_ms: Option<f32>,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            smoothed_ms: None,
            dt_min,
            dt_max,
        }
    }

    /// Resets the baseline, e.g. after the window was restored.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let raw = now.saturating_duration_since(self.last);
        let dt = raw.clamp(self.dt_min, self.dt_max);
        self.last = now;

        let raw_ms = raw.as_secs_f32() * 1000.0;
        let smoothed_ms = match self.smoothed_ms {
            None => raw_ms,
            Some(prev) => prev + (raw_ms - prev) * SMOOTHING,
        };
        self.smoothed_ms = Some(smoothed_ms);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            smoothed_ms,
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_is_clamped_to_max() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(50));
        let start = clock.last;
        let ft = clock.tick_at(start + Duration::from_secs(3));
        assert!((ft.dt - 0.05).abs() < 1e-6);
        // The readout still reflects the stall.
        assert!((ft.smoothed_ms - 3000.0).abs() < 1e-2);
    }

    #[test]
    fn smoothing_moves_toward_new_samples() {
        let mut clock = FrameClock::new();
        let t0 = clock.last;
        clock.tick_at(t0 + Duration::from_millis(10));
        let ft = clock.tick_at(t0 + Duration::from_millis(30));
        // 10 + (20 - 10) * 0.1
        assert!((ft.smoothed_ms - 11.0).abs() < 1e-3);
        assert_eq!(ft.frame_index, 1);
    }
}
