use std::time::Duration;

use crate::error::EngineError;

/// Engine-wide configuration.
///
/// Finalize it before constructing any collaborator: the surface, the logger
/// and the loop engine all read it once at construction time. The `debug`
/// flag lives here rather than in a global.
#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    /// Target ticks per second, `0` for variable-step ticks.
    pub target_tick_rate: f64,

    /// Target frames per second, `0` to draw every iteration.
    pub target_frame_rate: f64,

    /// Enables debug logging and extra diagnostics.
    pub debug: bool,

    /// Sleep while both rates are capped and nothing is due.
    pub sleep_when_idle: bool,

    /// Upper bound on the elapsed time fed into one loop iteration.
    pub max_elapsed: Option<Duration>,
}

impl EngineSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_rate(mut self, rate: f64) -> Self {
        self.target_tick_rate = rate;
        self
    }

    pub fn frame_rate(mut self, rate: f64) -> Self {
        self.target_frame_rate = rate;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn sleep_when_idle(mut self, sleep: bool) -> Self {
        self.sleep_when_idle = sleep;
        self
    }

    pub fn max_elapsed(mut self, max: Duration) -> Self {
        self.max_elapsed = Some(max);
        self
    }

    /// Checks that both rates are finite and non-negative.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (axis, value) in [
            ("tick", self.target_tick_rate),
            ("frame", self.target_frame_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidRate { axis, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_uncapped() {
        let s = EngineSettings::default();
        assert_eq!(s.target_tick_rate, 0.0);
        assert_eq!(s.target_frame_rate, 0.0);
        assert!(!s.debug);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn negative_rate_is_rejected() {
        let err = EngineSettings::new().tick_rate(-1.0).validate().unwrap_err();
        assert_eq!(err, EngineError::InvalidRate { axis: "tick", value: -1.0 });
    }

    #[test]
    fn nan_frame_rate_is_rejected() {
        let err = EngineSettings::new().frame_rate(f64::NAN).validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidRate { axis: "frame", .. }));
    }
}
