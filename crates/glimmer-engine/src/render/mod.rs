//! GPU rendering helpers shared by the lighting passes.
//!
//! Convention:
//! - every pass is a full-screen triangle generated from `vertex_index`
//!   (`shaders/fullscreen.wgsl`), except layer blits which upload a quad
//! - CPU positions are pixels (top-left origin, +Y down)
//! - lighting programs work in scene UV (Y flipped, origin bottom-left)

pub(crate) mod blit;
pub(crate) mod common;
mod ctx;
pub(crate) mod texture;

pub use ctx::RenderTarget;
pub use texture::{FilterMode, Texture};
