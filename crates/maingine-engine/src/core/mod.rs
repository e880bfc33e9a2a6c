//! Mode contract and the named mode state machine.
//!
//! Modes are stored in an embedder-owned [`ModeArena`]; the [`ModeRegistry`]
//! only holds handles and decides which mode receives `tick`/`draw`.

mod mode;
mod registry;

pub use mode::{Mode, ModeArena, ModeId};
pub use registry::ModeRegistry;
