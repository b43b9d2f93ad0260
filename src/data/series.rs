//! Bounded time series feeding the live query chart.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of samples kept per series.
pub const SERIES_CAPACITY: usize = 10;

/// A single timestamped metric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Fixed-capacity series of samples in arrival order.
///
/// Once full, every push evicts the oldest sample before appending, so the
/// series always holds the most recent `capacity` samples chronologically.
#[derive(Debug, Clone)]
pub struct BoundedSeries {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl Default for BoundedSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundedSeries {
    /// Create an empty series holding [`SERIES_CAPACITY`] samples.
    pub fn new() -> Self {
        Self::with_capacity(SERIES_CAPACITY)
    }

    /// Create an empty series with a custom capacity (at least 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one when at capacity.
    pub fn push(&mut self, sample: Sample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate samples oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Values only, oldest first.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Largest value currently held.
    pub fn max_value(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.value).reduce(f64::max)
    }

    /// Smallest value currently held.
    pub fn min_value(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.value).reduce(f64::min)
    }
}
