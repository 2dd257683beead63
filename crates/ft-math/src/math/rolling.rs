//! Bounded sample window with running moments.
//!
//! Holds the last `capacity` samples in FIFO order together with a running
//! sum and sum of squares, so mean and population variance stay O(1) per
//! update. Aggregates are adjusted incrementally on insert and evict, never
//! recomputed from the stored samples.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// FIFO sample window of fixed capacity with O(1) mean and variance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingMoments {
    samples: VecDeque<f64>,
    capacity: usize,
    sum: f64,
    sum_sq: f64,
}

impl RollingMoments {
    /// Create an empty window holding at most `capacity` samples.
    ///
    /// A zero capacity is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    /// Insert a sample, evicting the oldest one first when the window is full.
    pub fn observe(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            if let Some(evicted) = self.samples.pop_front() {
                self.sum -= evicted;
                self.sum_sq -= evicted * evicted;
            }
        }
        self.samples.push_back(value);
        self.sum += value;
        self.sum_sq += value * value;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn sum_sq(&self) -> f64 {
        self.sum_sq
    }

    /// Arithmetic mean of the current window, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.sum / self.samples.len() as f64)
    }

    /// Population variance from the running aggregates, `None` when empty.
    ///
    /// Computed as `(sum_sq - sum^2/n) / n`. Cancellation can drive the raw
    /// value a hair below zero for near-constant windows, so the result is
    /// clamped at zero.
    pub fn population_variance(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let n = self.samples.len() as f64;
        Some(((self.sum_sq - self.sum * self.sum / n) / n).max(0.0))
    }
}
