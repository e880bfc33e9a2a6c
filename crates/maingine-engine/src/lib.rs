//! Maingine engine crate.
//!
//! A minimal real-time application engine: a fixed-tick, variable-frame main
//! loop ([`time::LoopEngine`]) driving whichever named [`core::Mode`] the
//! [`core::ModeRegistry`] has active, on top of a pollable, presentable
//! [`surface::Surface`].
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`core`] | `Mode`, `ModeArena`, `ModeRegistry` |
//! | [`time`] | `LoopEngine`, `LoopHandle`, `FrameClock` |
//! | [`surface`] | `Surface` contract, `HeadlessSurface` |
//! | [`window`] | `WindowSurface` (winit + wgpu) |
//! | [`engine`] | `Maingine` facade |

pub mod core;
pub mod device;
pub mod engine;
pub mod error;
pub mod logging;
pub mod settings;
pub mod surface;
pub mod time;
pub mod window;

#[cfg(test)]
mod testing;

pub use engine::{Maingine, VERSION};
pub use error::EngineError;
pub use settings::EngineSettings;
