//! # Summary
//!
//! Per-key running aggregate. A `Summary` always holds at least one value, so
//! `min <= max` and `count >= 1` hold for every instance. Combining is
//! commutative and associative, which is what lets batches be folded and
//! merged in any order across workers.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    min: f64,
    max: f64,
    sum: f64,
    count: u64,
}

impl Summary {
    /// Summary of a single observed value
    pub fn from_value(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    /// Summary of a sequence of values, `None` when the sequence is empty
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut values = values.into_iter();
        let mut summary = Self::from_value(values.next()?);
        for value in values {
            summary.observe(value);
        }
        Some(summary)
    }

    /// Fold one more value into this summary
    #[inline]
    pub fn observe(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    /// Pure combination of two summaries
    pub fn combine(a: Summary, b: Summary) -> Summary {
        Summary {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
            sum: a.sum + b.sum,
            count: a.count + b.count,
        }
    }

    /// In-place form of [`Summary::combine`]
    #[inline]
    pub fn merge(&mut self, other: &Summary) {
        *self = Summary::combine(*self, *other);
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}
