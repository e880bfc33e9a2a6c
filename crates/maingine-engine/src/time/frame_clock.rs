use std::time::{Duration, Instant};

/// Loop timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous measurement, in seconds.
    pub dt: f64,

    /// Monotonic timestamp taken at the measurement.
    pub now: Instant,
}

/// Wall-clock source for the loop engine.
///
/// Unlike a render clock there is no lower clamp: the accumulators need the
/// real elapsed time, including near-zero values from tight loops. An upper
/// clamp can be configured to keep a debugger pause from turning into a long
/// catch-up burst of ticks.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    max_elapsed: Option<Duration>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            max_elapsed: None,
        }
    }

    /// Creates a clock that never reports more than `max_elapsed` per tick.
    pub fn with_max_elapsed(max_elapsed: Duration) -> Self {
        Self {
            max_elapsed: Some(max_elapsed),
            ..Self::new()
        }
    }

    /// Resets the baseline so the next tick measures from now.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Measures the time since the previous tick.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let mut elapsed = now.saturating_duration_since(self.last);

        if let Some(max) = self.max_elapsed {
            elapsed = elapsed.min(max);
        }

        self.last = now;

        FrameTime {
            dt: elapsed.as_secs_f64(),
            now,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_after_reset_is_small() {
        let mut clock = FrameClock::new();
        clock.reset();
        let ft = clock.tick();
        assert!(ft.dt < 0.5);
    }

    #[test]
    fn consecutive_ticks_advance_the_timestamp() {
        let mut clock = FrameClock::new();
        let first = clock.tick();
        std::thread::sleep(Duration::from_millis(2));
        let second = clock.tick();
        assert!(second.now > first.now);
        assert!(second.dt >= 0.002);
    }

    #[test]
    fn max_elapsed_clamps() {
        let mut clock = FrameClock::with_max_elapsed(Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.tick().dt <= 0.001);
    }
}
