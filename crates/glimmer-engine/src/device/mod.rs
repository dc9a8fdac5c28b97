//! GPU device + window surface.
//!
//! [`Gpu`] owns the wgpu Instance/Adapter/Device/Queue and the configured
//! surface, hands out per-frame encoders, and presents. The lighting engine
//! takes clones of the device and queue from it.

mod frame;
mod gpu;
mod init;
mod surface;

pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
