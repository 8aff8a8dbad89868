//! HTTP surface for the prediction service.
//!
//! Domain outcomes always travel in the body with a `status` field and an
//! HTTP 200; existing clients switch on `status`, not on the transport code.

pub mod predict;
pub mod response;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::predictor::Predictor;

pub fn router(predictor: Arc<Predictor>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", post(predict::predict))
        .layer(TraceLayer::new_for_http())
        .with_state(predictor)
}

async fn home() -> &'static str {
    "Solar Power Prediction API is Running!"
}
