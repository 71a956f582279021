//! Scalar types and a minimal time series container for model output.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub type FloatValue = f64;
pub type Time = f64;

/// Seconds in a Julian year
pub const SECONDS_PER_YEAR: FloatValue = 365.25 * 24.0 * 3600.0;

/// Convert a duration in millions of years to seconds
pub fn myr_to_seconds(myr: FloatValue) -> Time {
    myr * 1e6 * SECONDS_PER_YEAR
}

/// Convert a duration in seconds to billions of years
pub fn seconds_to_gyr(seconds: Time) -> FloatValue {
    seconds / (1e9 * SECONDS_PER_YEAR)
}

/// A single variable sampled on a monotonic time axis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeseries {
    time: Array1<Time>,
    values: Array1<FloatValue>,
}

impl Timeseries {
    /// Build a time series from matching value and time arrays
    ///
    /// # Panics
    /// Panics if the lengths differ.
    pub fn from_values(values: Array1<FloatValue>, time: Array1<Time>) -> Self {
        assert_eq!(values.len(), time.len(), "values and time must match");
        Self { time, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn time(&self) -> &Array1<Time> {
        &self.time
    }

    pub fn values(&self) -> &Array1<FloatValue> {
        &self.values
    }

    pub fn latest_value(&self) -> Option<FloatValue> {
        self.values.last().copied()
    }

    /// True when no value exceeds its predecessor by more than `tolerance`
    pub fn is_non_increasing(&self, tolerance: FloatValue) -> bool {
        self.values
            .windows(2)
            .into_iter()
            .all(|w| w[1] <= w[0] + tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_latest_value() {
        let ts = Timeseries::from_values(array![3.0, 2.0, 1.0], array![0.0, 1.0, 2.0]);
        assert_eq!(ts.latest_value(), Some(1.0));
        assert_eq!(ts.len(), 3);
    }

    #[test]
    fn test_non_increasing() {
        let falling = Timeseries::from_values(array![3.0, 2.0, 2.0], array![0.0, 1.0, 2.0]);
        assert!(falling.is_non_increasing(0.0));

        let bump = Timeseries::from_values(array![3.0, 2.0, 2.5], array![0.0, 1.0, 2.0]);
        assert!(!bump.is_non_increasing(1e-6));
    }

    #[test]
    #[should_panic(expected = "values and time must match")]
    fn test_mismatched_lengths() {
        Timeseries::from_values(array![1.0], array![0.0, 1.0]);
    }

    #[test]
    fn test_time_conversions() {
        let t = myr_to_seconds(1000.0);
        assert!((seconds_to_gyr(t) - 1.0).abs() < 1e-12);
    }
}
