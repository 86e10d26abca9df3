//! Progress-advancing strategies for the animation driver.
//!
//! Exactly one strategy drives a run. Both are pure with respect to time:
//! the caller passes `now` in, so they behave identically on the wall clock
//! and on a virtual clock.

use crate::error::TrackerError;
use crate::progress::Progress;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Serializable strategy selection with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Fire every `interval_ms`, advance by `step`.
    FixedTick { interval_ms: u64, step: f64 },

    /// Fire every `frame_interval_ms`, advance by elapsed / `journey_ms`.
    FrameDriven { frame_interval_ms: u64, journey_ms: u64 },
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::FixedTick {
            interval_ms: 3000,
            step: 0.05,
        }
    }
}

impl StrategyConfig {
    /// Default frame-driven parameters: ~60 FPS over one minute.
    pub fn frame_driven() -> Self {
        StrategyConfig::FrameDriven {
            frame_interval_ms: 16,
            journey_ms: 60_000,
        }
    }

    /// Returns the strategy name.
    pub fn name(&self) -> &'static str {
        match self {
            StrategyConfig::FixedTick { .. } => "fixed_tick",
            StrategyConfig::FrameDriven { .. } => "frame_driven",
        }
    }

    /// Rejects parameters that would never finish or never fire.
    pub fn validate(&self) -> Result<(), TrackerError> {
        match *self {
            StrategyConfig::FixedTick { interval_ms, step } => {
                if interval_ms == 0 {
                    return Err(TrackerError::invalid("tick interval must be positive"));
                }
                if !step.is_finite() || step <= 0.0 {
                    return Err(TrackerError::invalid(format!(
                        "tick step must be a positive number, got {step}"
                    )));
                }
            }
            StrategyConfig::FrameDriven {
                frame_interval_ms,
                journey_ms,
            } => {
                if frame_interval_ms == 0 {
                    return Err(TrackerError::invalid("frame interval must be positive"));
                }
                if journey_ms == 0 {
                    return Err(TrackerError::invalid("journey duration must be positive"));
                }
            }
        }
        Ok(())
    }

    /// Builds a fresh strategy from this configuration.
    pub fn build(&self) -> Strategy {
        match *self {
            StrategyConfig::FixedTick { interval_ms, step } => {
                Strategy::FixedTick(FixedTick::new(Duration::from_millis(interval_ms), step))
            }
            StrategyConfig::FrameDriven {
                frame_interval_ms,
                journey_ms,
            } => Strategy::FrameDriven(FrameDriven::new(
                Duration::from_millis(frame_interval_ms),
                Duration::from_millis(journey_ms),
            )),
        }
    }
}

/// Fixed increment per timer fire.
#[derive(Debug, Clone)]
pub struct FixedTick {
    interval: Duration,
    step: f64,
    ticks: u64,
}

impl FixedTick {
    pub fn new(interval: Duration, step: f64) -> Self {
        Self {
            interval,
            step,
            ticks: 0,
        }
    }

    /// Progress after one more tick.
    ///
    /// Computed as `ticks * step` rather than by repeated addition, so that
    /// 20 ticks of 0.05 land on exactly 1.0.
    pub fn next_progress(&mut self, current: Progress) -> Progress {
        self.ticks += 1;
        Progress::new(self.ticks as f64 * self.step).max(current)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Progress proportional to elapsed time since the animation began.
#[derive(Debug, Clone)]
pub struct FrameDriven {
    frame_interval: Duration,
    journey: Duration,
    began_at: Option<Duration>,
}

impl FrameDriven {
    pub fn new(frame_interval: Duration, journey: Duration) -> Self {
        Self {
            frame_interval,
            journey,
            began_at: None,
        }
    }

    /// Progress at time `now`.
    pub fn next_progress(&mut self, current: Progress, now: Duration) -> Progress {
        let began_at = *self.began_at.get_or_insert(now);
        let elapsed = now.saturating_sub(began_at);
        Progress::new(elapsed.as_secs_f64() / self.journey.as_secs_f64()).max(current)
    }
}

/// The active strategy of a run.
#[derive(Debug, Clone)]
pub enum Strategy {
    FixedTick(FixedTick),
    FrameDriven(FrameDriven),
}

impl Strategy {
    /// Returns the strategy name.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::FixedTick(_) => "fixed_tick",
            Strategy::FrameDriven(_) => "frame_driven",
        }
    }

    /// Time between two consecutive steps.
    pub fn interval(&self) -> Duration {
        match self {
            Strategy::FixedTick(s) => s.interval,
            Strategy::FrameDriven(s) => s.frame_interval,
        }
    }

    /// Marks the beginning of the animation at `now`.
    pub fn begin(&mut self, now: Duration) {
        if let Strategy::FrameDriven(s) = self {
            s.began_at = Some(now);
        }
    }

    /// Computes the next progress value.
    pub fn next_progress(&mut self, current: Progress, now: Duration) -> Progress {
        match self {
            Strategy::FixedTick(s) => s.next_progress(current),
            Strategy::FrameDriven(s) => s.next_progress(current, now),
        }
    }

    /// Forgets all accumulated timing.
    pub fn reset(&mut self) {
        match self {
            Strategy::FixedTick(s) => s.ticks = 0,
            Strategy::FrameDriven(s) => s.began_at = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_tick_reaches_one_at_tick_twenty() {
        let mut strategy = FixedTick::new(Duration::from_millis(3000), 0.05);
        let mut progress = Progress::START;

        for tick in 1..=19 {
            progress = strategy.next_progress(progress);
            assert!(!progress.is_complete(), "complete early at tick {tick}");
        }
        progress = strategy.next_progress(progress);
        assert_eq!(progress, Progress::COMPLETE);
        assert_eq!(strategy.ticks(), 20);
    }

    #[test]
    fn test_fixed_tick_clamps_uneven_step() {
        let mut strategy = FixedTick::new(Duration::from_millis(10), 0.3);
        let mut progress = Progress::START;
        for _ in 0..4 {
            progress = strategy.next_progress(progress);
        }
        assert_eq!(progress, Progress::COMPLETE);
    }

    #[test]
    fn test_frame_driven_is_proportional_to_elapsed() {
        let mut strategy = FrameDriven::new(Duration::from_millis(16), Duration::from_secs(10));
        let mut s = Strategy::FrameDriven(strategy.clone());
        s.begin(Duration::from_secs(5));

        let p = s.next_progress(Progress::START, Duration::from_secs(7));
        assert_relative_eq!(p.value(), 0.2, epsilon = 1e-12);

        let p = s.next_progress(p, Duration::from_millis(14_500));
        assert_relative_eq!(p.value(), 0.95, epsilon = 1e-12);

        let p = s.next_progress(p, Duration::from_secs(60));
        assert_eq!(p, Progress::COMPLETE);

        // Without begin(), the first frame anchors the clock
        let p = strategy.next_progress(Progress::START, Duration::from_secs(3));
        assert_eq!(p, Progress::START);
    }

    #[test]
    fn test_frame_driven_never_goes_backwards() {
        let mut s = StrategyConfig::frame_driven().build();
        s.begin(Duration::from_secs(10));
        let p = Progress::new(0.5);
        // Clock earlier than begin
        assert_eq!(s.next_progress(p, Duration::from_secs(1)), p);
    }

    #[test]
    fn test_reset_restarts_counting() {
        let mut s = StrategyConfig::default().build();
        s.next_progress(Progress::START, Duration::ZERO);
        s.next_progress(Progress::START, Duration::ZERO);
        s.reset();
        let p = s.next_progress(Progress::START, Duration::ZERO);
        assert_relative_eq!(p.value(), 0.05);
    }

    #[test]
    fn test_validate_rejects_degenerate_parameters() {
        let bad = [
            StrategyConfig::FixedTick { interval_ms: 0, step: 0.05 },
            StrategyConfig::FixedTick { interval_ms: 100, step: 0.0 },
            StrategyConfig::FixedTick { interval_ms: 100, step: f64::NAN },
            StrategyConfig::FrameDriven { frame_interval_ms: 0, journey_ms: 100 },
            StrategyConfig::FrameDriven { frame_interval_ms: 16, journey_ms: 0 },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?}");
        }
        assert!(StrategyConfig::default().validate().is_ok());
        assert!(StrategyConfig::frame_driven().validate().is_ok());
    }

    #[test]
    fn test_config_serde_tag() {
        let json = serde_json::to_string(&StrategyConfig::default()).unwrap();
        assert_eq!(json, r#"{"kind":"fixed_tick","interval_ms":3000,"step":0.05}"#);

        let parsed: StrategyConfig =
            serde_json::from_str(r#"{"kind":"frame_driven","frame_interval_ms":20,"journey_ms":1000}"#)
                .unwrap();
        assert_eq!(parsed.name(), "frame_driven");
        assert_eq!(parsed.build().interval(), Duration::from_millis(20));
    }
}
