//! Inference service shared by every consumer surface.
//!
//! The predictor is constructed explicitly with the store it loads from; it
//! holds no global state. The bundle is loaded at most once per predictor
//! lifetime and shared immutably, so concurrent callers after the first load
//! never synchronize.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::error::PredictError;
use crate::schema::FeatureVector;
use crate::store::{BundleStore, ModelBundle};

pub struct Predictor {
    store: BundleStore,
    bundle: OnceCell<Arc<ModelBundle>>,
}

impl Predictor {
    pub fn new(store: BundleStore) -> Self {
        Self { store, bundle: OnceCell::new() }
    }

    /// Forces the one-time artifact load.
    ///
    /// Interactive consumers call this at startup and treat failure as fatal;
    /// the API skips it and lets each request surface the error instead.
    pub fn preload(&self) -> Result<(), PredictError> {
        self.bundle().map(|_| ())
    }

    fn bundle(&self) -> Result<&Arc<ModelBundle>, PredictError> {
        self.bundle.get_or_try_init(|| {
            let bundle = self.store.load()?;
            info!(
                model_id = %bundle.metadata.model_id,
                trained_at = %bundle.metadata.trained_at,
                "model bundle loaded"
            );
            Ok::<_, PredictError>(Arc::new(bundle))
        })
    }

    /// Predicts energy output (Wh) for one feature vector.
    ///
    /// Pure function of the loaded bundle and the input. The raw ensemble
    /// average is returned without rounding or clamping; a negative estimate
    /// is possible for out-of-distribution inputs and is only logged.
    pub fn predict(&self, input: &FeatureVector) -> Result<f64, PredictError> {
        let bundle = self.bundle()?;
        input.validate()?;

        let standardized = bundle.scaler.transform(&input.as_array());
        let value = bundle.forest.predict_one(&standardized)?;

        if value < 0.0 {
            warn!(value, "prediction is negative; input is likely out of distribution");
        }
        Ok(value)
    }

    /// Metadata of the loaded bundle, if the load already happened.
    pub fn loaded_metadata(&self) -> Option<&crate::store::BundleMetadata> {
        self.bundle.get().map(|b| &b.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::trainer::train_and_save;
    use std::io::Write;

    fn trained_predictor(dir: &std::path::Path) -> Predictor {
        let mut cfg = Config::default();
        cfg.data.dataset_path = dir.join("data.csv");
        cfg.data.bundle_path = dir.join("model.bundle");
        cfg.training.n_trees = 10;
        cfg.training.max_depth = Some(6);

        let mut file = std::fs::File::create(&cfg.data.dataset_path).unwrap();
        writeln!(file, "GHI,temp,humidity,wind_speed,pressure,clouds_all,Energy delta[Wh]")
            .unwrap();
        for i in 0..50 {
            let ghi = 100.0 + 20.0 * (i % 25) as f64;
            let temp = 5.0 + (i % 15) as f64;
            writeln!(file, "{ghi},{temp},50,3.0,1012,20,{:.1}", ghi + 10.0 * temp).unwrap();
        }

        train_and_save(&cfg).unwrap();
        Predictor::new(BundleStore::new(&cfg.data.bundle_path))
    }

    #[test]
    fn identical_inputs_yield_identical_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = trained_predictor(dir.path());

        let input = FeatureVector::new(300.0, 12.0, 50.0, 3.0, 1012.0, 20.0);
        let first = predictor.predict(&input).unwrap();
        let second = predictor.predict(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_bundle_is_model_unavailable_not_a_default() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = Predictor::new(BundleStore::new(dir.path().join("absent.bundle")));

        let input = FeatureVector::new(300.0, 12.0, 50.0, 3.0, 1012.0, 20.0);
        assert!(matches!(
            predictor.predict(&input),
            Err(PredictError::ModelUnavailable(_))
        ));
        assert!(predictor.preload().is_err());
    }

    #[test]
    fn invalid_input_is_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = trained_predictor(dir.path());

        let mut bad = FeatureVector::new(300.0, f64::NAN, 50.0, 3.0, 1012.0, 20.0);
        assert!(matches!(
            predictor.predict(&bad),
            Err(PredictError::InvalidInput { .. })
        ));

        // Same predictor keeps serving after a rejected request.
        bad.temp = 12.0;
        assert!(predictor.predict(&bad).is_ok());
    }

    #[test]
    fn concurrent_first_callers_share_one_load() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = Arc::new(trained_predictor(dir.path()));
        let input = FeatureVector::new(300.0, 12.0, 50.0, 3.0, 1012.0, 20.0);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let p = Arc::clone(&predictor);
                std::thread::spawn(move || p.predict(&input).unwrap())
            })
            .collect();

        let results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }
}
