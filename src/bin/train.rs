//! One-shot batch training job.
//!
//! Reads the configured dataset, fits and evaluates the model, and persists
//! the artifact bundle. Exits 0 with metrics on stdout, 1 on any failure.

use solar_forecast::{config::Config, telemetry, trainer};

fn main() {
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match trainer::train_and_save(&config) {
        Ok(report) => {
            println!(
                "Trained random forest - RMSE: {:.4}, MAE: {:.4}",
                report.metrics.rmse, report.metrics.mae
            );
            println!(
                "Saved model bundle to {}",
                config.data.bundle_path.display()
            );
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
