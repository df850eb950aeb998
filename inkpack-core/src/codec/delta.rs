//! Delta-delta predictor for packet streams
//!
//! Pen coordinates change smoothly, so the second difference
//! `x[n] - 2*x[n-1] + x[n-2]` is usually much smaller than the samples.

use crate::{InkError, Result};

/// Second-order predictor state
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaDelta {
    prev: i64,
    prev_prev: i64,
}

impl DeltaDelta {
    /// Create a predictor with zero history
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the history
    pub fn reset(&mut self) {
        self.prev = 0;
        self.prev_prev = 0;
    }

    /// Transform one sample
    pub fn transform(&mut self, sample: i32) -> i64 {
        let sample = i64::from(sample);
        let residual = sample - 2 * self.prev + self.prev_prev;
        self.prev_prev = self.prev;
        self.prev = sample;
        residual
    }

    /// Recover one sample from its residual
    pub fn inverse(&mut self, residual: i64) -> Result<i32> {
        let sample = residual
            .checked_add(2 * self.prev)
            .and_then(|v| v.checked_sub(self.prev_prev))
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| {
                InkError::Overflow(format!("delta-delta residual {} leaves i32 range", residual))
            })?;

        self.prev_prev = self.prev;
        self.prev = i64::from(sample);
        Ok(sample)
    }

    /// Transform a whole sequence from a fresh state
    pub fn transform_all(samples: &[i32]) -> Vec<i64> {
        let mut predictor = Self::new();
        samples.iter().map(|&s| predictor.transform(s)).collect()
    }

    /// Invert a whole sequence from a fresh state
    pub fn inverse_all(residuals: &[i64]) -> Result<Vec<i32>> {
        let mut predictor = Self::new();
        residuals.iter().map(|&r| predictor.inverse(r)).collect()
    }
}
