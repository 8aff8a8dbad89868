//! Per-feature standardization fitted on the training partition only.

use serde::{Deserialize, Serialize};

use crate::error::TrainError;
use crate::schema::FEATURE_COUNT;

/// Fitted standardization transform: `x' = (x - mean) / std` componentwise.
///
/// Statistics come exclusively from the training partition; the held-out
/// partition and every inference input are transformed with these frozen
/// values. Standard deviation is the population estimate (divide by n).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    std: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    /// Fits per-column mean and standard deviation.
    pub fn fit(rows: &[[f64; FEATURE_COUNT]]) -> Result<Self, TrainError> {
        if rows.is_empty() {
            return Err(TrainError::EmptyDataset);
        }
        let n = rows.len() as f64;

        let mut mean = [0.0; FEATURE_COUNT];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut std = [0.0; FEATURE_COUNT];
        for row in rows {
            for ((s, v), m) in std.iter_mut().zip(row).zip(&mean) {
                *s += (v - m) * (v - m);
            }
        }
        for s in &mut std {
            *s = (*s / n).sqrt();
        }

        Ok(Self { mean, std })
    }

    /// Standardizes one row in canonical column order.
    ///
    /// A constant column (zero spread) maps to 0.0 instead of dividing by
    /// zero, matching the value a centered constant would take anyway.
    pub fn transform(&self, row: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            out[i] = if self.std[i].abs() < 1e-12 {
                0.0
            } else {
                (row[i] - self.mean[i]) / self.std[i]
            };
        }
        out
    }

    pub fn transform_batch(&self, rows: &[[f64; FEATURE_COUNT]]) -> Vec<[f64; FEATURE_COUNT]> {
        rows.iter().map(|r| self.transform(r)).collect()
    }

    pub fn mean(&self) -> &[f64; FEATURE_COUNT] {
        &self.mean
    }

    pub fn std(&self) -> &[f64; FEATURE_COUNT] {
        &self.std
    }
}
