use std::time::Duration;

use crate::core::{ModeArena, ModeRegistry};
use crate::settings::EngineSettings;
use crate::surface::Surface;

use super::frame_clock::FrameClock;
use super::handle::{LoopHandle, LoopStats};

/// Outcome of a single loop iteration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Fixed-tick, variable-frame main loop.
///
/// Each iteration converts the elapsed wall-clock time into tick and frame
/// budgets. Owed ticks run back to back with the fixed tick period as their
/// delta, so the simulation advances by the same quantum regardless of host
/// speed. At most one frame is drawn per iteration; surplus frame budget is
/// carried over rather than discarded. A rate of `0` uncaps its axis: one
/// variable-step tick and one frame per iteration.
///
/// Close requests (from [`LoopEngine::stop`] or the surface) are observed
/// right after the tick phase, so no frame is drawn once one is seen.
pub struct LoopEngine {
    handle: LoopHandle,

    tick_accumulator: f64,
    frame_accumulator: f64,
    stats_window: f64,

    ticks: u32,
    frames: u32,

    sleep_when_idle: bool,
    max_elapsed: Option<Duration>,
}

impl LoopEngine {
    pub fn new(settings: &EngineSettings) -> Self {
        let handle = LoopHandle::default();
        handle.set_target_tick_rate(settings.target_tick_rate);
        handle.set_target_frame_rate(settings.target_frame_rate);

        log::debug!(
            "loop engine created (ticks/s={}, frames/s={})",
            settings.target_tick_rate,
            settings.target_frame_rate
        );

        Self {
            handle,
            tick_accumulator: 0.0,
            frame_accumulator: 0.0,
            stats_window: 0.0,
            ticks: 0,
            frames: 0,
            sleep_when_idle: settings.sleep_when_idle,
            max_elapsed: settings.max_elapsed,
        }
    }

    /// Shorthand for an engine with the given rates and default settings.
    pub fn with_rates(tick_rate: f64, frame_rate: f64) -> Self {
        Self::new(&EngineSettings::new().tick_rate(tick_rate).frame_rate(frame_rate))
    }

    /// Returns a handle sharing this engine's control state.
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn set_target_tick_rate(&mut self, rate: f64) {
        self.handle.set_target_tick_rate(rate);
    }

    pub fn set_target_frame_rate(&mut self, rate: f64) {
        self.handle.set_target_frame_rate(rate);
    }

    /// Sleep between iterations until the next tick or frame is due.
    pub fn set_sleep_when_idle(&mut self, sleep: bool) {
        self.sleep_when_idle = sleep;
    }

    pub fn sleeps_when_idle(&self) -> bool {
        self.sleep_when_idle
    }

    pub fn target_tick_rate(&self) -> f64 {
        self.handle.target_tick_rate()
    }

    pub fn target_frame_rate(&self) -> f64 {
        self.handle.target_frame_rate()
    }

    pub fn tick_period(&self) -> f64 {
        self.handle.tick_period()
    }

    pub fn frame_period(&self) -> f64 {
        self.handle.frame_period()
    }

    pub fn stats(&self) -> LoopStats {
        self.handle.stats()
    }

    /// Ticks counted in the last full second; `0` before the first one.
    pub fn current_ticks_per_second(&self) -> u32 {
        self.handle.current_ticks_per_second()
    }

    /// Frames counted in the last full second; `0` before the first one.
    pub fn current_frames_per_second(&self) -> u32 {
        self.handle.current_frames_per_second()
    }

    /// Requests termination at the next tick boundary.
    pub fn stop(&self) {
        self.handle.stop();
    }

    pub fn is_stop_requested(&self) -> bool {
        self.handle.is_stop_requested()
    }

    /// Owed ticks not yet run, in tick periods.
    pub fn tick_accumulator(&self) -> f64 {
        self.tick_accumulator
    }

    /// Owed frames not yet drawn, in frame periods.
    pub fn frame_accumulator(&self) -> f64 {
        self.frame_accumulator
    }

    /// Runs the loop on the calling thread until a stop is observed.
    ///
    /// Cleanup of modes and surface is left to the caller. On return the stop
    /// flag and the accumulators are cleared so the engine can run again.
    pub fn run<S>(&mut self, surface: &mut S, modes: &mut ModeRegistry, arena: &mut ModeArena)
    where
        S: Surface + ?Sized,
    {
        log::info!(
            "starting the loop (ticks/s={}, frames/s={})",
            self.target_tick_rate(),
            self.target_frame_rate()
        );

        let mut clock = match self.max_elapsed {
            Some(max) => FrameClock::with_max_elapsed(max),
            None => FrameClock::new(),
        };
        clock.reset();

        loop {
            let ft = clock.tick();
            if self.step(ft.dt, surface, modes, arena) == LoopControl::Stop {
                break;
            }

            // The budgets were sized at `ft.now`; work done since then counts
            // against the wait.
            if self.sleep_when_idle {
                if let Some(idle) = self.idle_time(ft.now.elapsed()) {
                    std::thread::sleep(idle);
                }
            }
        }

        self.reset();
        log::info!("the loop has been stopped");
    }

    /// Performs one loop iteration for `elapsed` seconds of wall-clock time.
    pub fn step<S>(
        &mut self,
        elapsed: f64,
        surface: &mut S,
        modes: &mut ModeRegistry,
        arena: &mut ModeArena,
    ) -> LoopControl
    where
        S: Surface + ?Sized,
    {
        self.stats_window += elapsed;

        // Tick phase.
        let tick_period = self.handle.tick_period();
        if tick_period > 0.0 {
            self.tick_accumulator += elapsed * self.handle.target_tick_rate();

            while self.tick_accumulator >= 1.0 {
                self.poll_input(surface);
                modes.tick(arena, tick_period);
                if self.handle.is_stop_requested() {
                    return LoopControl::Stop;
                }
                self.ticks += 1;
                self.tick_accumulator -= 1.0;
            }
        } else {
            self.poll_input(surface);
            modes.tick(arena, elapsed);
            if self.handle.is_stop_requested() {
                return LoopControl::Stop;
            }
            self.ticks += 1;
        }

        // A stop raised outside the tick phase (before `run`, or from `draw`)
        // still takes effect here, before anything is drawn.
        if self.handle.is_stop_requested() {
            return LoopControl::Stop;
        }

        // Frame phase.
        if self.handle.frame_period() > 0.0 {
            self.frame_accumulator += elapsed * self.handle.target_frame_rate();

            if self.frame_accumulator >= 1.0 {
                self.draw(surface, modes, arena);
                self.frame_accumulator -= 1.0;
            }
        } else {
            self.draw(surface, modes, arena);
        }

        if self.stats_window >= 1.0 {
            self.flush_stats();
        }

        LoopControl::Continue
    }

    /// Time until the next tick or frame is due, when both rates are capped.
    ///
    /// The accumulators reflect the last measurement; `spent` is the wall time
    /// that has passed since it and is subtracted from the wait. Returns `None`
    /// when either axis is uncapped or work is already due.
    pub fn idle_time(&self, spent: Duration) -> Option<Duration> {
        let tick_rate = self.handle.target_tick_rate();
        let frame_rate = self.handle.target_frame_rate();
        if tick_rate <= 0.0 || frame_rate <= 0.0 {
            return None;
        }

        let tick_wait = (1.0 - self.tick_accumulator) / tick_rate;
        let frame_wait = (1.0 - self.frame_accumulator) / frame_rate;
        let wait = tick_wait.min(frame_wait) - spent.as_secs_f64();

        (wait > 0.0).then(|| Duration::from_secs_f64(wait))
    }

    fn poll_input<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.poll_events();
        if !surface.is_open() || surface.is_close_requested() {
            self.handle.stop();
        }
    }

    fn draw<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        modes: &mut ModeRegistry,
        arena: &mut ModeArena,
    ) {
        modes.draw(arena);
        surface.present();
        self.frames += 1;
    }

    fn flush_stats(&mut self) {
        let stats = LoopStats {
            ticks_per_second: self.ticks,
            frames_per_second: self.frames,
        };
        self.handle.publish_stats(stats);
        log::debug!("ups={} fps={}", stats.ticks_per_second, stats.frames_per_second);

        self.ticks = 0;
        self.frames = 0;
        self.stats_window = 0.0;
    }

    fn reset(&mut self) {
        self.handle.clear_stop();
        self.tick_accumulator = 0.0;
        self.frame_accumulator = 0.0;
        self.stats_window = 0.0;
        self.ticks = 0;
        self.frames = 0;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Instant;

    use super::*;
    use crate::core::{Mode, ModeId};
    use crate::surface::HeadlessSurface;
    use crate::testing::{Journal, Recorder, StopOnTick};

    struct Rig {
        engine: LoopEngine,
        surface: HeadlessSurface,
        modes: ModeRegistry,
        arena: ModeArena,
        journal: Journal,
    }

    impl Rig {
        fn new(tick_rate: f64, frame_rate: f64) -> Self {
            let journal = Journal::default();
            let mut arena = ModeArena::new();
            let mut modes = ModeRegistry::new();

            let id = arena.insert(Recorder::new("m", &journal));
            modes.add("m", id);
            modes.select(&mut arena, Some("m"));
            journal.borrow_mut().clear();

            Self {
                engine: LoopEngine::with_rates(tick_rate, frame_rate),
                surface: HeadlessSurface::new(),
                modes,
                arena,
                journal,
            }
        }

        fn step(&mut self, elapsed: f64) -> LoopControl {
            self.engine
                .step(elapsed, &mut self.surface, &mut self.modes, &mut self.arena)
        }

        fn install(&mut self, name: &str, id: ModeId) {
            self.modes.add(name, id);
            self.modes.select(&mut self.arena, Some(name));
            self.journal.borrow_mut().clear();
        }

        fn count(&self, prefix: &str) -> usize {
            self.journal
                .borrow()
                .iter()
                .filter(|e| e.starts_with(prefix))
                .count()
        }

        fn entries(&self) -> Vec<String> {
            self.journal.borrow().clone()
        }
    }

    // ── tick phase ────────────────────────────────────────────────────────

    #[test]
    fn capped_ticks_use_fixed_delta() {
        let mut rig = Rig::new(20.0, 0.0);
        for _ in 0..4 {
            assert_eq!(rig.step(0.25), LoopControl::Continue);
        }

        assert_eq!(rig.count("m:tick(0.05)"), 20);
        assert_eq!(rig.count("m:tick"), 20);
        assert_eq!(rig.count("m:draw"), 4);
        assert_eq!(rig.surface.frames(), 4);
        assert_eq!(rig.surface.polls(), 20);
    }

    #[test]
    fn ticks_catch_up_and_keep_fraction() {
        let mut rig = Rig::new(10.0, 0.0);
        rig.step(0.05);
        assert_eq!(rig.count("m:tick"), 0);
        assert_eq!(rig.engine.tick_accumulator(), 0.5);

        rig.step(0.25);
        assert_eq!(rig.count("m:tick"), 3);
        assert_eq!(rig.engine.tick_accumulator(), 0.0);
    }

    #[test]
    fn uncapped_ticks_use_measured_elapsed() {
        let mut rig = Rig::new(0.0, 0.0);
        rig.step(0.125);
        rig.step(0.5);
        rig.step(0.0);

        assert_eq!(
            rig.entries(),
            ["m:tick(0.125)", "m:draw", "m:tick(0.5)", "m:draw", "m:tick(0)", "m:draw"]
        );
    }

    #[test]
    fn all_ticks_precede_the_draw() {
        let mut rig = Rig::new(8.0, 0.0);
        rig.step(0.5);
        assert_eq!(
            rig.entries(),
            ["m:tick(0.125)", "m:tick(0.125)", "m:tick(0.125)", "m:tick(0.125)", "m:draw"]
        );
    }

    // ── frame phase ───────────────────────────────────────────────────────

    #[test]
    fn frame_surplus_is_retained() {
        let mut rig = Rig::new(0.0, 10.0);
        rig.step(0.25);

        assert_eq!(rig.count("m:draw"), 1);
        assert_eq!(rig.surface.frames(), 1);
        assert!((rig.engine.frame_accumulator() - 1.5).abs() < 1e-9);

        // The retained budget pays for the next frame with no time passing.
        rig.step(0.0);
        assert_eq!(rig.count("m:draw"), 2);
        assert!((rig.engine.frame_accumulator() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn no_frame_before_budget_is_due() {
        let mut rig = Rig::new(0.0, 10.0);
        rig.step(0.05);
        assert_eq!(rig.count("m:draw"), 0);
        assert_eq!(rig.surface.frames(), 0);
    }

    // ── statistics ────────────────────────────────────────────────────────

    #[test]
    fn stats_sample_after_one_second() {
        let mut rig = Rig::new(30.0, 0.0);
        assert_eq!(rig.engine.current_ticks_per_second(), 0);

        rig.step(1.0);
        assert_eq!(rig.engine.current_ticks_per_second(), 30);
        assert_eq!(rig.engine.current_frames_per_second(), 1);
    }

    #[test]
    fn stats_counters_reset_per_window() {
        let mut rig = Rig::new(30.0, 0.0);
        for _ in 0..4 {
            rig.step(0.25);
        }
        assert_eq!(rig.engine.current_ticks_per_second(), 30);
        assert_eq!(rig.engine.current_frames_per_second(), 4);

        rig.step(0.5);
        assert_eq!(rig.engine.current_ticks_per_second(), 30);

        rig.step(0.5);
        assert_eq!(rig.engine.stats(), LoopStats { ticks_per_second: 30, frames_per_second: 2 });
    }

    #[test]
    fn stats_wait_for_a_full_second() {
        let mut rig = Rig::new(30.0, 0.0);
        rig.step(0.5);
        assert_eq!(rig.engine.current_ticks_per_second(), 0);
    }

    // ── stopping ──────────────────────────────────────────────────────────

    #[test]
    fn stop_during_tick_skips_remaining_ticks_and_draw() {
        let mut rig = Rig::new(20.0, 0.0);
        let handle = rig.engine.handle();
        let id = rig.arena.insert(StopOnTick::new(3, handle, &rig.journal));
        rig.install("stopper", id);

        assert_eq!(rig.step(0.25), LoopControl::Stop);
        assert_eq!(rig.count("stopper:tick"), 3);
        assert_eq!(rig.count("stopper:draw"), 0);
        assert_eq!(rig.surface.frames(), 0);
    }

    #[test]
    fn surface_close_request_stops_before_drawing() {
        let mut rig = Rig::new(20.0, 0.0);
        rig.surface.request_close();

        assert_eq!(rig.step(0.25), LoopControl::Stop);
        assert_eq!(rig.entries(), ["m:tick(0.05)"]);
        assert!(rig.engine.is_stop_requested());
    }

    #[test]
    fn closed_surface_counts_as_close_request() {
        let mut rig = Rig::new(0.0, 0.0);
        rig.surface.close();

        assert_eq!(rig.step(0.1), LoopControl::Stop);
        assert_eq!(rig.count("m:draw"), 0);
    }

    #[test]
    fn stop_outside_tick_phase_still_prevents_draw() {
        let mut rig = Rig::new(20.0, 0.0);
        rig.engine.stop();

        // Not enough time for a tick; the stop is still honoured.
        assert_eq!(rig.step(0.01), LoopControl::Stop);
        assert!(rig.entries().is_empty());
    }

    #[test]
    fn run_returns_after_stop_from_tick() {
        let mut rig = Rig::new(0.0, 0.0);
        let handle = rig.engine.handle();
        let id = rig.arena.insert(StopOnTick::new(1, handle, &rig.journal));
        rig.install("stopper", id);

        rig.engine.run(&mut rig.surface, &mut rig.modes, &mut rig.arena);

        assert_eq!(rig.count("stopper:tick"), 1);
        assert_eq!(rig.count("stopper:draw"), 0);
        assert!(!rig.engine.is_stop_requested());
    }

    #[test]
    fn run_returns_when_surface_asks_to_close() {
        let mut rig = Rig::new(0.0, 0.0);
        rig.surface = HeadlessSurface::new().close_after_frames(3);

        rig.engine.run(&mut rig.surface, &mut rig.modes, &mut rig.arena);

        assert_eq!(rig.surface.frames(), 3);
        assert_eq!(rig.count("m:draw"), 3);
        assert_eq!(rig.count("m:tick"), 4);
    }

    // ── rates ─────────────────────────────────────────────────────────────

    #[test]
    fn rates_can_change_between_steps() {
        let mut rig = Rig::new(0.0, 0.0);
        rig.step(0.25);
        assert_eq!(rig.count("m:tick"), 1);

        rig.engine.set_target_tick_rate(4.0);
        assert_eq!(rig.engine.tick_period(), 0.25);
        rig.step(0.5);
        assert_eq!(rig.count("m:tick(0.25)"), 2);
    }

    #[test]
    fn idle_time_needs_both_rates_capped() {
        let rig = Rig::new(10.0, 0.0);
        assert_eq!(rig.engine.idle_time(Duration::ZERO), None);

        let rig = Rig::new(10.0, 4.0);
        let idle = rig.engine.idle_time(Duration::ZERO).unwrap();
        assert!((idle.as_secs_f64() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn idle_time_never_passes_the_next_boundary() {
        let mut rig = Rig::new(10.0, 4.0);
        rig.step(0.05);
        let idle = rig.engine.idle_time(Duration::ZERO).unwrap();
        assert!(idle.as_secs_f64() <= 0.05 + 1e-9);
    }

    #[test]
    fn idle_time_subtracts_work_already_done() {
        let mut rig = Rig::new(10.0, 10.0);
        rig.step(0.05);

        let idle = rig.engine.idle_time(Duration::from_millis(20)).unwrap();
        assert!((idle.as_secs_f64() - 0.03).abs() < 1e-6);
        assert_eq!(rig.engine.idle_time(Duration::from_millis(50)), None);
        assert_eq!(rig.engine.idle_time(Duration::from_millis(80)), None);
    }

    // ── pacing ────────────────────────────────────────────────────────────

    struct SlowDraw {
        handle: LoopHandle,
        ticks: Rc<RefCell<Vec<Instant>>>,
        stop_after: usize,
        draw_cost: Duration,
    }

    impl Mode for SlowDraw {
        fn tick(&mut self, _dt: f64) {
            let mut ticks = self.ticks.borrow_mut();
            ticks.push(Instant::now());
            if ticks.len() >= self.stop_after {
                self.handle.stop();
            }
        }

        fn draw(&mut self) {
            std::thread::sleep(self.draw_cost);
        }
    }

    #[test]
    fn idle_sleep_accounts_for_slow_draws() {
        let mut rig = Rig::new(10.0, 10.0);
        rig.engine.set_sleep_when_idle(true);

        let ticks = Rc::new(RefCell::new(Vec::new()));
        let id = rig.arena.insert(SlowDraw {
            handle: rig.engine.handle(),
            ticks: ticks.clone(),
            stop_after: 6,
            draw_cost: Duration::from_millis(60),
        });
        rig.install("slow", id);

        rig.engine.run(&mut rig.surface, &mut rig.modes, &mut rig.arena);

        // Each 100 ms period leaves 40 ms after the draw, so every tick is
        // reached on time; oversleeping would make each gap about 160 ms.
        let ticks = ticks.borrow();
        assert_eq!(ticks.len(), 6);
        for pair in ticks.windows(2) {
            let gap = pair[1].duration_since(pair[0]);
            assert!(gap < Duration::from_millis(135), "tick gap {gap:?}");
        }
    }
}
