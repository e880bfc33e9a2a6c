//! Native window surface.
//!
//! Owns the `winit` event loop and window but never hands control to winit:
//! events are pumped from the engine's own loop, once per tick.

mod settings;
mod surface;

pub use settings::WindowSettings;
pub use surface::WindowSurface;
pub use winit::dpi::PhysicalSize;
