use std::cell::Cell;
use std::rc::Rc;

/// Most recent one-second sample of measured rates.
///
/// Updated once per second of loop time. Meant for display and coarse
/// statistics, not for per-frame logic.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks_per_second: u32,
    pub frames_per_second: u32,
}

#[derive(Debug, Default)]
struct Shared {
    stop_requested: Cell<bool>,
    tick_rate: Cell<f64>,
    tick_period: Cell<f64>,
    frame_rate: Cell<f64>,
    frame_period: Cell<f64>,
    stats: Cell<LoopStats>,
}

/// Shared view of a [`LoopEngine`]'s control state.
///
/// Clones are cheap and refer to the same engine. Modes keep one to stop the
/// loop, read UPS/FPS or retarget rates while the loop is running. The handle
/// is single-threaded: it lives on the loop thread like everything else.
///
/// [`LoopEngine`]: super::LoopEngine
#[derive(Debug, Default, Clone)]
pub struct LoopHandle(Rc<Shared>);

impl LoopHandle {
    /// Requests termination at the next tick boundary.
    pub fn stop(&self) {
        self.0.stop_requested.set(true);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.stop_requested.get()
    }

    /// Sets the target ticks per second. `0` switches to variable-step ticks.
    pub fn set_target_tick_rate(&self, rate: f64) {
        let rate = sanitize_rate("tick", rate);
        self.0.tick_rate.set(rate);
        self.0.tick_period.set(period_of(rate));
    }

    /// Sets the target frames per second. `0` draws every iteration.
    pub fn set_target_frame_rate(&self, rate: f64) {
        let rate = sanitize_rate("frame", rate);
        self.0.frame_rate.set(rate);
        self.0.frame_period.set(period_of(rate));
    }

    pub fn target_tick_rate(&self) -> f64 {
        self.0.tick_rate.get()
    }

    pub fn target_frame_rate(&self) -> f64 {
        self.0.frame_rate.get()
    }

    /// Fixed tick period in seconds, `0` when ticks are uncapped.
    pub fn tick_period(&self) -> f64 {
        self.0.tick_period.get()
    }

    /// Frame period in seconds, `0` when frames are uncapped.
    pub fn frame_period(&self) -> f64 {
        self.0.frame_period.get()
    }

    pub fn stats(&self) -> LoopStats {
        self.0.stats.get()
    }

    pub fn current_ticks_per_second(&self) -> u32 {
        self.stats().ticks_per_second
    }

    pub fn current_frames_per_second(&self) -> u32 {
        self.stats().frames_per_second
    }

    pub(crate) fn publish_stats(&self, stats: LoopStats) {
        self.0.stats.set(stats);
    }

    pub(crate) fn clear_stop(&self) {
        self.0.stop_requested.set(false);
    }
}

fn sanitize_rate(axis: &str, rate: f64) -> f64 {
    if rate.is_finite() && rate >= 0.0 {
        rate
    } else {
        log::warn!("invalid target {axis} rate {rate}; running uncapped");
        0.0
    }
}

fn period_of(rate: f64) -> f64 {
    if rate > 0.0 { 1.0 / rate } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_follows_rate() {
        let h = LoopHandle::default();
        h.set_target_tick_rate(4.0);
        h.set_target_frame_rate(20.0);
        assert_eq!(h.tick_period(), 0.25);
        assert_eq!(h.frame_period(), 0.05);

        h.set_target_tick_rate(0.0);
        assert_eq!(h.tick_period(), 0.0);
    }

    #[test]
    fn invalid_rates_disable_the_cap() {
        let h = LoopHandle::default();
        h.set_target_tick_rate(-5.0);
        assert_eq!(h.target_tick_rate(), 0.0);
        assert_eq!(h.tick_period(), 0.0);

        h.set_target_frame_rate(f64::NAN);
        assert_eq!(h.target_frame_rate(), 0.0);

        h.set_target_frame_rate(f64::INFINITY);
        assert_eq!(h.frame_period(), 0.0);
    }

    #[test]
    fn clones_share_state() {
        let a = LoopHandle::default();
        let b = a.clone();
        b.stop();
        assert!(a.is_stop_requested());

        a.publish_stats(LoopStats { ticks_per_second: 3, frames_per_second: 2 });
        assert_eq!(b.current_ticks_per_second(), 3);
        assert_eq!(b.current_frames_per_second(), 2);
    }
}
