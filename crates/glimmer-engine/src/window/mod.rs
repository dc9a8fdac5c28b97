//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single game window, and wires them to
//! the GPU layer and the lighting engine.

mod runtime;

pub use runtime::{Runtime, RuntimeCtx};
