//! Normalized journey progress.

use serde::{Deserialize, Serialize};

/// Fraction of the journey completed, always within [0, 1].
///
/// Construction clamps; NaN collapses to zero. Deserialization goes
/// through the same clamp.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Progress(f64);

impl Progress {
    /// Nothing travelled yet.
    pub const START: Progress = Progress(0.0);

    /// Marker has arrived.
    pub const COMPLETE: Progress = Progress(1.0);

    /// Creates a progress value, clamped to [0, 1].
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::START;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Returns the raw fraction.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the fraction as a percentage.
    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }

    /// Returns true once the journey is finished.
    pub fn is_complete(self) -> bool {
        self.0 >= 1.0
    }

    /// Returns the larger of two progress values.
    pub fn max(self, other: Progress) -> Self {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }
}

impl From<f64> for Progress {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Progress> for f64 {
    fn from(progress: Progress) -> Self {
        progress.0
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_clamps() {
        assert_eq!(Progress::new(-0.5), Progress::START);
        assert_eq!(Progress::new(1.7), Progress::COMPLETE);
        assert_eq!(Progress::new(f64::NAN), Progress::START);
        assert_eq!(Progress::new(0.25).value(), 0.25);
    }

    #[test]
    fn test_deserialize_clamps() {
        assert_eq!(serde_json::from_str::<Progress>("1.7").unwrap(), Progress::COMPLETE);
        assert_eq!(serde_json::from_str::<Progress>("-2.0").unwrap(), Progress::START);
        assert_eq!(serde_json::from_str::<Progress>("0.25").unwrap().value(), 0.25);
        assert_eq!(serde_json::to_string(&Progress::new(0.5)).unwrap(), "0.5");
    }

    #[test]
    fn test_display_as_percent() {
        assert_eq!(Progress::new(0.5).to_string(), "50.0%");
    }
}
