/// What the surface did after a failed frame acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Swapchain was reconfigured; the next present may succeed.
    Reconfigured,
    /// Transient error; this frame is dropped.
    SkipFrame,
    /// Unrecoverable (commonly OOM); the surface should close.
    Fatal,
}
