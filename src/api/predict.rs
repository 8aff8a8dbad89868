use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{debug, error};

use super::response::PredictResponse;
use crate::error::PredictError;
use crate::predictor::Predictor;
use crate::schema::FeatureVector;

/// POST /predict
///
/// Body must carry exactly the six canonical feature keys, all numeric.
/// Every outcome is an HTTP 200 with a `status` field; a malformed body or a
/// missing model never takes the serving process down. Parse failures are
/// reported by field name, not by deserializer position.
pub async fn predict(
    State(predictor): State<Arc<Predictor>>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Json<PredictResponse> {
    let value = match payload {
        Ok(Json(value)) => value,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "rejected request body");
            return Json(PredictResponse::error(rejection.body_text()));
        }
    };

    let input = match FeatureVector::from_json(&value) {
        Ok(input) => input,
        Err(e) => {
            debug!(error = %e, "rejected feature vector");
            return Json(PredictResponse::error(e.to_string()));
        }
    };

    match predictor.predict(&input) {
        Ok(value) => Json(PredictResponse::success(value)),
        Err(e @ PredictError::InvalidInput { .. }) => {
            debug!(error = %e, "invalid feature vector");
            Json(PredictResponse::error(e.to_string()))
        }
        Err(e) => {
            error!(error = %e, "prediction failed");
            Json(PredictResponse::error(e.to_string()))
        }
    }
}
