//! Display surface contract.
//!
//! The loop only needs four things from a window or graphics context: whether
//! it is still open, whether the user asked it to close, a way to pump native
//! events and a way to present the frame that modes just drew.

mod headless;

pub use headless::HeadlessSurface;

/// Native display collaborator driven by the loop engine.
///
/// All calls happen on the loop thread.
pub trait Surface {
    /// Returns `false` once the underlying window/context is gone.
    fn is_open(&self) -> bool;

    /// Returns `true` when the platform asked the surface to close.
    fn is_close_requested(&self) -> bool;

    /// Processes pending native events. Called once per tick.
    fn poll_events(&mut self);

    /// Presents the frame drawn since the previous call.
    fn present(&mut self);
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn is_close_requested(&self) -> bool {
        (**self).is_close_requested()
    }

    fn poll_events(&mut self) {
        (**self).poll_events()
    }

    fn present(&mut self) {
        (**self).present()
    }
}
