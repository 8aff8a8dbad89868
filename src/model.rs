//! Random forest regressor over standardized feature rows.
//!
//! Thin wrapper around SmartCore's `RandomForestRegressor`: prediction is the
//! arithmetic mean of the individual trees and has no randomness at inference
//! time. The forest is immutable once fitted.

use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::{PredictError, TrainError};
use crate::schema::FEATURE_COUNT;

/// Ensemble hyperparameters. Seeded so repeated training runs on the same
/// data produce the same forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestHyperparams {
    pub n_trees: usize,
    pub seed: u64,
    pub max_depth: Option<u16>,
}

impl Default for ForestHyperparams {
    fn default() -> Self {
        Self { n_trees: 100, seed: 42, max_depth: None }
    }
}

impl ForestHyperparams {
    fn to_parameters(&self) -> RandomForestRegressorParameters {
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(self.n_trees)
            .with_seed(self.seed);
        match self.max_depth {
            Some(depth) => params.with_max_depth(depth),
            None => params,
        }
    }
}

/// Fitted regression ensemble.
#[derive(Debug, Serialize, Deserialize)]
pub struct EnergyForest {
    forest: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
    pub hyperparams: ForestHyperparams,
    pub training_samples: usize,
}

impl EnergyForest {
    /// Fits the ensemble on standardized training rows.
    pub fn fit(
        rows: &[[f64; FEATURE_COUNT]],
        targets: &[f64],
        hyperparams: ForestHyperparams,
    ) -> Result<Self, TrainError> {
        if rows.is_empty() {
            return Err(TrainError::EmptyDataset);
        }
        if rows.len() != targets.len() {
            return Err(TrainError::Fit(format!(
                "feature and target count mismatch: {} rows, {} targets",
                rows.len(),
                targets.len()
            )));
        }

        let x = dense_matrix(rows);
        let y = targets.to_vec();

        let forest = RandomForestRegressor::fit(&x, &y, hyperparams.to_parameters())
            .map_err(|e| TrainError::Fit(format!("random forest training failed: {e}")))?;

        Ok(Self { forest, hyperparams, training_samples: rows.len() })
    }

    /// Predicts a single standardized row.
    pub fn predict_one(&self, row: &[f64; FEATURE_COUNT]) -> Result<f64, PredictError> {
        let x = DenseMatrix::new(1, FEATURE_COUNT, row.to_vec(), false);
        let predictions = self
            .forest
            .predict(&x)
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| PredictError::Inference("model returned no prediction".to_string()))
    }

    /// Predicts a batch of standardized rows, preserving order.
    pub fn predict_batch(&self, rows: &[[f64; FEATURE_COUNT]]) -> Result<Vec<f64>, PredictError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let x = dense_matrix(rows);
        self.forest
            .predict(&x)
            .map_err(|e| PredictError::Inference(e.to_string()))
    }
}

fn dense_matrix(rows: &[[f64; FEATURE_COUNT]]) -> DenseMatrix<f64> {
    let mut flat = Vec::with_capacity(rows.len() * FEATURE_COUNT);
    for row in rows {
        flat.extend_from_slice(row);
    }
    DenseMatrix::new(rows.len(), FEATURE_COUNT, flat, false)
}
