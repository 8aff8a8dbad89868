//! Error taxonomy for the training and inference pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the training pipeline.
///
/// Schema and data-source errors abort the batch job before any artifact is
/// written; the store is only touched once fitting and evaluation succeeded.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("data source '{path}' could not be read: {source}")]
    DataSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("required columns missing from dataset: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("no admissible rows left after dropping incomplete observations")]
    EmptyDataset,

    #[error("model fitting failed: {0}")]
    Fit(String),

    #[error(transparent)]
    Store(#[from] ArtifactError),
}

/// Errors raised by the artifact store.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact bundle not found at '{0}'")]
    NotFound(PathBuf),

    #[error("artifact bundle at '{path}' is unusable: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("failed to write artifact bundle '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the inference path.
///
/// `ModelUnavailable` is terminal for the calling process only in interactive
/// consumers; the API converts it to a structured error response per request.
/// `InvalidInput` is always recoverable: the caller can retry with corrected
/// values.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("model artifacts unavailable: {0}")]
    ModelUnavailable(#[from] ArtifactError),

    #[error("invalid input: {}", fields.join(", "))]
    InvalidInput { fields: Vec<String> },

    #[error("prediction failed: {0}")]
    Inference(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_missing_columns() {
        let err = TrainError::Schema {
            missing: vec!["pressure".to_string(), "Energy delta[Wh]".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("pressure"));
        assert!(msg.contains("Energy delta[Wh]"));
    }

    #[test]
    fn invalid_input_names_offending_fields() {
        let err = PredictError::InvalidInput {
            fields: vec!["temp".to_string()],
        };
        assert!(err.to_string().contains("temp"));
    }

    #[test]
    fn artifact_error_propagates_into_predict_error() {
        let err: PredictError = ArtifactError::NotFound(PathBuf::from("missing.bundle")).into();
        assert!(matches!(err, PredictError::ModelUnavailable(_)));
        assert!(err.to_string().contains("missing.bundle"));
    }
}
