//! Time subsystem.
//!
//! - `FrameClock` measures wall-clock time between loop iterations
//! - `LoopEngine` turns elapsed time into fixed ticks and paced frames
//! - `LoopHandle` shares stop/rate/statistics state with running modes

mod frame_clock;
mod handle;
mod loop_engine;

pub use frame_clock::{FrameClock, FrameTime};
pub use handle::{LoopHandle, LoopStats};
pub use loop_engine::{LoopControl, LoopEngine};
