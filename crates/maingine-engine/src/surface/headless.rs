use super::Surface;

/// Surface without a window.
///
/// Presents are only counted. Useful for tests, servers and tools that run
/// modes without a display. Optionally requests a close on its own after a
/// number of presented frames.
#[derive(Debug, Default, Clone)]
pub struct HeadlessSurface {
    closed: bool,
    close_requested: bool,
    close_after_frames: Option<u64>,
    polls: u64,
    frames: u64,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the close request once `frames` frames have been presented.
    pub fn close_after_frames(mut self, frames: u64) -> Self {
        self.close_after_frames = Some(frames);
        self
    }

    /// Raises the close request, as a window manager would.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Marks the surface as gone. A closed surface also reports a close request.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Number of `poll_events` calls so far.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Number of `present` calls so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Surface for HeadlessSurface {
    fn is_open(&self) -> bool {
        !self.closed
    }

    fn is_close_requested(&self) -> bool {
        self.closed || self.close_requested
    }

    fn poll_events(&mut self) {
        self.polls += 1;
    }

    fn present(&mut self) {
        self.frames += 1;
        if self.close_after_frames.is_some_and(|n| self.frames >= n) {
            self.close_requested = true;
        }
    }
}
