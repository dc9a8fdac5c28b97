//! Color model shared by the lighting core and the layer blitter.
//!
//! Colors are stored normalized (`0.0..=1.0`, straight alpha). The public
//! surface of the engine talks in 0–255 integers; conversion happens here.

pub mod color;

pub use color::{Color, InvalidColorLength};
