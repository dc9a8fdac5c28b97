//! Minimal input tracking.
//!
//! Just enough for a scene to steer lights with the pointer and toggle
//! settings from the keyboard. The public API does not expose winit types;
//! the runtime translates platform events into [`InputEvent`]s.

mod state;
mod types;

pub use state::InputState;
pub use types::{InputEvent, Key, MouseButton};
