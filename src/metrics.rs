//! Held-out evaluation metrics.
//!
//! These are observability output only: they are logged and stored in the
//! bundle metadata but never gate persistence.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TrainError;

/// Regression accuracy on the held-out partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalMetrics {
    /// Mean absolute error, Wh.
    pub mae: f64,
    /// Root mean squared error, Wh.
    pub rmse: f64,
    /// Coefficient of determination.
    pub r2: f64,
    /// Number of held-out samples evaluated.
    pub sample_count: usize,
}

impl EvalMetrics {
    pub fn calculate(predicted: &[f64], actual: &[f64]) -> Result<Self, TrainError> {
        if predicted.len() != actual.len() {
            return Err(TrainError::Fit(format!(
                "prediction and target count mismatch: {} vs {}",
                predicted.len(),
                actual.len()
            )));
        }
        if predicted.is_empty() {
            return Err(TrainError::Fit("no predictions to evaluate".to_string()));
        }

        let n = predicted.len() as f64;

        let mae = predicted
            .iter()
            .zip(actual)
            .map(|(p, a)| (p - a).abs())
            .sum::<f64>()
            / n;

        let mse = predicted
            .iter()
            .zip(actual)
            .map(|(p, a)| (p - a) * (p - a))
            .sum::<f64>()
            / n;
        let rmse = mse.sqrt();

        let mean_actual = actual.iter().sum::<f64>() / n;
        let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual) * (a - mean_actual)).sum();
        let ss_res: f64 = predicted
            .iter()
            .zip(actual)
            .map(|(p, a)| (a - p) * (a - p))
            .sum();
        let r2 = if ss_tot.abs() < 1e-10 { 0.0 } else { 1.0 - ss_res / ss_tot };

        Ok(Self { mae, rmse, r2, sample_count: predicted.len() })
    }
}

impl fmt::Display for EvalMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RMSE: {:.4}, MAE: {:.4}, R²: {:.4} ({} samples)",
            self.rmse, self.mae, self.r2, self.sample_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions_score_zero_error() {
        let values = vec![1.0, 2.0, 3.0];
        let m = EvalMetrics::calculate(&values, &values).unwrap();
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.r2, 1.0);
        assert_eq!(m.sample_count, 3);
    }

    #[test]
    fn known_errors_produce_known_metrics() {
        let predicted = vec![2.0, 4.0];
        let actual = vec![1.0, 2.0];
        let m = EvalMetrics::calculate(&predicted, &actual).unwrap();

        assert!((m.mae - 1.5).abs() < 1e-12);
        assert!((m.rmse - (2.5f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(EvalMetrics::calculate(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(EvalMetrics::calculate(&[], &[]).is_err());
    }
}
