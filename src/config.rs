use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::model::ForestHyperparams;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 5000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Tabular source of historical observations.
    pub dataset_path: PathBuf,
    /// Where the fitted scaler/model bundle lives.
    pub bundle_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("solar_weather.csv"),
            bundle_path: PathBuf::from("solar_rf_model.bundle"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub n_trees: usize,
    pub seed: u64,
    /// Held-out fraction for evaluation.
    pub test_fraction: f64,
    pub max_depth: Option<u16>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self { n_trees: 100, seed: 42, test_fraction: 0.2, max_depth: None }
    }
}

impl TrainingConfig {
    pub fn hyperparams(&self) -> ForestHyperparams {
        ForestHyperparams {
            n_trees: self.n_trees,
            seed: self.seed,
            max_depth: self.max_depth,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("SOLAR__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_training_contract() {
        let cfg = Config::default();
        assert_eq!(cfg.training.n_trees, 100);
        assert_eq!(cfg.training.seed, 42);
        assert_eq!(cfg.training.test_fraction, 0.2);
        assert_eq!(cfg.data.bundle_path, PathBuf::from("solar_rf_model.bundle"));
    }

    #[test]
    fn server_config_parses_to_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 5000);
    }
}
