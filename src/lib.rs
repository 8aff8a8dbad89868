//! Solar energy output prediction from meteorological readings.
//!
//! Two lifecycle phases share one artifact contract: the trainer fits a
//! standardization transform and a random forest from historical CSV data and
//! persists both as a single versioned bundle; the predictor loads the bundle
//! once and answers feature vectors with scalar Wh estimates.

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod model;
pub mod predictor;
pub mod scaler;
pub mod schema;
pub mod store;
pub mod telemetry;
pub mod trainer;

pub use error::{ArtifactError, PredictError, TrainError};
pub use predictor::Predictor;
pub use schema::{FeatureVector, Observation, FEATURE_COLUMNS, TARGET_COLUMN};
pub use store::{BundleStore, ModelBundle};
