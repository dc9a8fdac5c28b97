//! 2D dynamic lighting: point lights, polygon occluders and the multi-pass
//! compositor that turns them into a lit frame.
//!
//! Per frame:
//! 1. enabled hulls are packed into fixed-capacity storage buffers
//! 2. each enabled light adds its shadowed falloff into a ping-pong accumulator
//! 3. the accumulator is blurred into the lightmap (or copied, radius 0)
//! 4. the background is multiplied by `min(lightmap, max) + ambient`
//! 5. the foreground is drawn on top, unlit
//!
//! [`software`] runs the same math on the CPU.

mod accumulator;
mod blur;
mod composite;
mod config;
mod engine;
mod error;
mod geometry;
mod hull;
mod layer;
mod light;
mod light_pass;
mod pending;
mod ping_pong;
mod scene;
pub mod software;

pub use blur::{MAX_BLUR_RADIUS, gaussian_kernel};
pub use composite::composite_viewport;
pub use config::{DisplayConfig, EngineConfig};
pub use engine::LightingEngine;
pub use error::{LightingError, LightingResult};
pub use geometry::{GeometryCapacity, HullGeometry, pack};
pub use hull::Hull;
pub use layer::Layer;
pub use light::PointLight;
pub use light_pass::{LightUniform, plan_light_passes};
pub use ping_pong::PingPong;
pub use scene::Scene;
