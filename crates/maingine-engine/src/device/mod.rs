//! GPU device + surface management.
//!
//! The engine treats rendering as opaque: this layer owns the wgpu device and
//! swapchain, and the window surface uses it only to clear the backbuffer to
//! its clear colour and present it once per frame.

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
