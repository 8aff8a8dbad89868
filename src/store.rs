//! Durable persistence of the fitted scaler/model pair.
//!
//! The scaler and the forest travel as one versioned bundle so a mismatched
//! pair can never be assembled from independently overwritten files. Writes
//! go through a temp file and an atomic rename; a concurrently running
//! predictor can never observe a partially written bundle.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ArtifactError;
use crate::metrics::EvalMetrics;
use crate::model::EnergyForest;
use crate::scaler::StandardScaler;
use crate::schema::{FEATURE_COLUMNS, TARGET_COLUMN};

/// Bumped whenever the serialized layout changes incompatibly.
pub const BUNDLE_FORMAT_VERSION: u32 = 1;

/// Provenance recorded alongside the fitted objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleMetadata {
    pub model_id: String,
    pub trained_at: DateTime<Utc>,
    pub training_samples: usize,
    pub holdout_metrics: EvalMetrics,
}

/// The matched scaler/model pair plus the schema both were fitted against.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelBundle {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub target_name: String,
    pub scaler: StandardScaler,
    pub forest: EnergyForest,
    pub metadata: BundleMetadata,
}

impl ModelBundle {
    pub fn new(scaler: StandardScaler, forest: EnergyForest, metadata: BundleMetadata) -> Self {
        Self {
            format_version: BUNDLE_FORMAT_VERSION,
            feature_names: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            target_name: TARGET_COLUMN.to_string(),
            scaler,
            forest,
            metadata,
        }
    }

    /// Rejects bundles written by an incompatible build or fitted against a
    /// different feature schema.
    fn validate(&self, path: &Path) -> Result<(), ArtifactError> {
        if self.format_version != BUNDLE_FORMAT_VERSION {
            return Err(ArtifactError::Corrupt {
                path: path.to_path_buf(),
                reason: format!(
                    "format version {} does not match expected {}",
                    self.format_version, BUNDLE_FORMAT_VERSION
                ),
            });
        }
        if self.feature_names != FEATURE_COLUMNS || self.target_name != TARGET_COLUMN {
            return Err(ArtifactError::Corrupt {
                path: path.to_path_buf(),
                reason: format!(
                    "bundle was fitted against a different schema: {:?} -> {}",
                    self.feature_names, self.target_name
                ),
            });
        }
        Ok(())
    }
}

/// File-backed bundle store keyed by a single path.
#[derive(Debug, Clone)]
pub struct BundleStore {
    path: PathBuf,
}

impl BundleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists the bundle, overwriting any previous one unconditionally.
    pub fn save(&self, bundle: &ModelBundle) -> Result<(), ArtifactError> {
        let bytes = bincode::serialize(bundle).map_err(|e| ArtifactError::Corrupt {
            path: self.path.clone(),
            reason: format!("serialization failed: {e}"),
        })?;

        let tmp = self.path.with_extension("bundle.tmp");
        fs::write(&tmp, &bytes).map_err(|source| ArtifactError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| ArtifactError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!(path = %self.path.display(), bytes = bytes.len(), "model bundle saved");
        Ok(())
    }

    /// Loads and validates the bundle.
    pub fn load(&self) -> Result<ModelBundle, ArtifactError> {
        let bytes = fs::read(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::NotFound(self.path.clone())
            } else {
                ArtifactError::Corrupt {
                    path: self.path.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let bundle: ModelBundle =
            bincode::deserialize(&bytes).map_err(|e| ArtifactError::Corrupt {
                path: self.path.clone(),
                reason: format!("deserialization failed: {e}"),
            })?;

        bundle.validate(&self.path)?;
        Ok(bundle)
    }
}
