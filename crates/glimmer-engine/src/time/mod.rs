//! Frame timing.
//!
//! One `FrameClock` per window; `tick()` once per presented frame. Besides the
//! clamped delta used for animation, the clock keeps a smoothed
//! milliseconds-per-frame figure for on-screen or logged performance readouts.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
