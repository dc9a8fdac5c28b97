//! glimmer engine crate.
//!
//! A 2D dynamic-lighting compositor (`lighting`) plus the platform and GPU
//! runtime pieces needed to drive it from a window.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod lighting;
