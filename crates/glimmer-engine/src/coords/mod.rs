//! Coordinate and geometry types shared by the lighting core and its collaborators.
//!
//! Two spaces are in play:
//! - native pixels: origin top-left, +X right, +Y down (scene positions, hulls)
//! - UV: `[0, 1]²` with Y flipped, origin bottom-left (lighting programs)
//!
//! [`Resolution::to_uv`] is the single conversion between them.

mod rect;
mod resolution;
mod transform;
mod vec2;

pub use rect::Rect;
pub use resolution::Resolution;
pub use transform::Transform2;
pub use vec2::Vec2;
