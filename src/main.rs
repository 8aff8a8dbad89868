use std::sync::Arc;

use anyhow::Result;
use solar_forecast::{api, config::Config, predictor::Predictor, store::BundleStore, telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let cfg = Config::load()?;

    let predictor = Arc::new(Predictor::new(BundleStore::new(&cfg.data.bundle_path)));
    // A missing bundle is not fatal for the service: every /predict request
    // reports the condition until a trained bundle appears at the path.
    if let Err(e) = predictor.preload() {
        warn!(error = %e, "model bundle not loadable at startup");
    }

    let app = api::router(predictor);
    let addr = cfg.server.socket_addr()?;
    info!(%addr, "starting solar forecast API");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    Ok(())
}
