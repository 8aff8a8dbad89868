//! End-to-end training pipeline: ingest, split, fit, evaluate, persist.

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::dataset::{self, Dataset};
use crate::error::TrainError;
use crate::metrics::EvalMetrics;
use crate::model::EnergyForest;
use crate::scaler::StandardScaler;
use crate::schema::{Observation, FEATURE_COUNT};
use crate::store::{BundleMetadata, BundleStore, ModelBundle};

/// Outcome of one training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub metrics: EvalMetrics,
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Runs the full pipeline and persists the fitted bundle.
///
/// Evaluation never gates persistence: a model is saved regardless of its
/// held-out quality. The store is only touched after every earlier stage
/// succeeded, so a failed run never leaves partial artifacts behind.
pub fn train_and_save(config: &Config) -> Result<TrainingReport, TrainError> {
    let dataset = dataset::load_csv(&config.data.dataset_path)?;
    if dataset.is_empty() {
        return Err(TrainError::EmptyDataset);
    }
    if dataset.rows_dropped > 0 {
        warn!(
            dropped = dataset.rows_dropped,
            read = dataset.rows_read,
            "dropped rows with missing or unparseable required values"
        );
    }

    let (bundle, report) = fit(&dataset, config)?;

    let store = BundleStore::new(&config.data.bundle_path);
    store.save(&bundle)?;

    info!(
        rmse = report.metrics.rmse,
        mae = report.metrics.mae,
        r2 = report.metrics.r2,
        train_rows = report.train_rows,
        test_rows = report.test_rows,
        "training complete"
    );

    Ok(report)
}

/// Fits scaler and forest and evaluates on the held-out partition.
fn fit(dataset: &Dataset, config: &Config) -> Result<(ModelBundle, TrainingReport), TrainError> {
    let (train, test) = dataset::train_test_split(
        &dataset.observations,
        config.training.test_fraction,
        config.training.seed,
    );
    if train.is_empty() || test.is_empty() {
        return Err(TrainError::EmptyDataset);
    }

    let train_rows = feature_rows(&train);
    let train_targets: Vec<f64> = train.iter().map(|o| o.energy_delta_wh).collect();
    let test_rows = feature_rows(&test);
    let test_targets: Vec<f64> = test.iter().map(|o| o.energy_delta_wh).collect();

    // The scaler sees the training partition only; the held-out rows are
    // transformed with its frozen statistics.
    let scaler = StandardScaler::fit(&train_rows)?;
    let train_scaled = scaler.transform_batch(&train_rows);
    let test_scaled = scaler.transform_batch(&test_rows);

    let forest = EnergyForest::fit(&train_scaled, &train_targets, config.training.hyperparams())?;

    let predictions = forest
        .predict_batch(&test_scaled)
        .map_err(|e| TrainError::Fit(e.to_string()))?;
    let metrics = EvalMetrics::calculate(&predictions, &test_targets)?;

    let metadata = BundleMetadata {
        model_id: format!("solar_rf_{}", Uuid::new_v4()),
        trained_at: chrono::Utc::now(),
        training_samples: train.len(),
        holdout_metrics: metrics.clone(),
    };

    let report = TrainingReport {
        metrics,
        rows_read: dataset.rows_read,
        rows_dropped: dataset.rows_dropped,
        train_rows: train.len(),
        test_rows: test.len(),
    };

    Ok((ModelBundle::new(scaler, forest, metadata), report))
}

fn feature_rows(observations: &[Observation]) -> Vec<[f64; FEATURE_COUNT]> {
    observations.iter().map(|o| o.features.as_array()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    fn write_training_csv(path: &Path, rows: usize) {
        let mut file = std::fs::File::create(path).unwrap();
        writeln!(file, "GHI,temp,humidity,wind_speed,pressure,clouds_all,Energy delta[Wh]")
            .unwrap();
        for i in 0..rows {
            let ghi = 100.0 + 25.0 * (i % 30) as f64;
            let temp = 10.0 + (i % 20) as f64;
            let clouds = (i % 10) as f64 * 10.0;
            let energy = 1.2 * ghi + 4.0 * temp - 2.0 * clouds;
            writeln!(file, "{ghi},{temp},50,3.0,1012,{clouds},{energy:.1}").unwrap();
        }
    }

    fn test_config(dir: &Path) -> Config {
        let mut cfg = Config::default();
        cfg.data.dataset_path = dir.join("solar_weather.csv");
        cfg.data.bundle_path = dir.join("solar_rf_model.bundle");
        cfg.training.n_trees = 10;
        cfg.training.max_depth = Some(6);
        cfg
    }

    #[test]
    fn pipeline_persists_a_loadable_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(dir.path());
        write_training_csv(&cfg.data.dataset_path, 60);

        let report = train_and_save(&cfg).unwrap();
        assert_eq!(report.train_rows, 48);
        assert_eq!(report.test_rows, 12);
        assert!(report.metrics.rmse.is_finite());

        let bundle = BundleStore::new(&cfg.data.bundle_path).load().unwrap();
        assert_eq!(bundle.metadata.training_samples, 48);
    }

    #[test]
    fn repeated_runs_reproduce_scaler_statistics_and_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = test_config(dir.path());
        write_training_csv(&cfg.data.dataset_path, 60);

        let first = train_and_save(&cfg).unwrap();
        let bundle_a = BundleStore::new(&cfg.data.bundle_path).load().unwrap();

        cfg.data.bundle_path = dir.path().join("second.bundle");
        let second = train_and_save(&cfg).unwrap();
        let bundle_b = BundleStore::new(&cfg.data.bundle_path).load().unwrap();

        assert_eq!(bundle_a.scaler, bundle_b.scaler);
        assert_eq!(first.metrics, second.metrics);
    }

    #[test]
    fn missing_dataset_never_touches_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(dir.path());

        let err = train_and_save(&cfg).unwrap_err();
        assert!(matches!(err, TrainError::DataSource { .. }));
        assert!(!cfg.data.bundle_path.exists());
    }

    #[test]
    fn missing_column_aborts_before_any_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(dir.path());

        let mut file = std::fs::File::create(&cfg.data.dataset_path).unwrap();
        writeln!(file, "GHI,temp,humidity,wind_speed,clouds_all,Energy delta[Wh]").unwrap();
        writeln!(file, "600,30,45,3.5,10,734.2").unwrap();

        let err = train_and_save(&cfg).unwrap_err();
        match err {
            TrainError::Schema { missing } => assert_eq!(missing, vec!["pressure".to_string()]),
            other => panic!("expected Schema error, got {other:?}"),
        }
        assert!(!cfg.data.bundle_path.exists());
    }
}
