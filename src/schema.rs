//! Canonical feature schema shared by training and inference.
//!
//! Both the scaler and the forest are fitted against this exact column order.
//! Every surface that builds a feature row goes through [`FeatureVector`], so
//! a transposed or partial vector cannot reach the model silently.

use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// Number of meteorological input features.
pub const FEATURE_COUNT: usize = 6;

/// Canonical feature column order. Load-bearing: fitted statistics and tree
/// splits are positional over this sequence.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] =
    ["GHI", "temp", "humidity", "wind_speed", "pressure", "clouds_all"];

/// Name of the training target column in the tabular source.
pub const TARGET_COLUMN: &str = "Energy delta[Wh]";

/// One set of meteorological readings, named rather than positional.
///
/// Serde field names match the wire/CSV contract exactly; unknown keys are
/// rejected so a caller cannot smuggle in a misspelled feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureVector {
    /// Global horizontal irradiance, W/m².
    #[serde(rename = "GHI")]
    pub ghi: f64,
    /// Air temperature, °C.
    pub temp: f64,
    /// Relative humidity, %.
    pub humidity: f64,
    /// Wind speed, m/s.
    pub wind_speed: f64,
    /// Atmospheric pressure, hPa.
    pub pressure: f64,
    /// Cloud cover, %.
    pub clouds_all: f64,
}

impl FeatureVector {
    pub fn new(
        ghi: f64,
        temp: f64,
        humidity: f64,
        wind_speed: f64,
        pressure: f64,
        clouds_all: f64,
    ) -> Self {
        Self { ghi, temp, humidity, wind_speed, pressure, clouds_all }
    }

    /// Values in canonical column order.
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [self.ghi, self.temp, self.humidity, self.wind_speed, self.pressure, self.clouds_all]
    }

    /// Builds a vector from values already in canonical column order.
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let [ghi, temp, humidity, wind_speed, pressure, clouds_all] = values;
        Self { ghi, temp, humidity, wind_speed, pressure, clouds_all }
    }

    /// Builds a vector from a JSON object, naming every offending key.
    ///
    /// A key is offending when it is missing, not a number, or not part of
    /// the canonical schema. This keeps parse failures recoverable and
    /// field-addressed instead of surfacing a raw deserializer position.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PredictError> {
        let Some(object) = value.as_object() else {
            return Err(PredictError::InvalidInput {
                fields: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            });
        };

        let mut values = [0.0f64; FEATURE_COUNT];
        let mut offending = Vec::new();
        for (slot, name) in values.iter_mut().zip(FEATURE_COLUMNS) {
            match object.get(name).and_then(serde_json::Value::as_f64) {
                Some(v) => *slot = v,
                None => offending.push(name.to_string()),
            }
        }
        for key in object.keys() {
            if !FEATURE_COLUMNS.contains(&key.as_str()) {
                offending.push(key.clone());
            }
        }

        if offending.is_empty() {
            Ok(Self::from_array(values))
        } else {
            Err(PredictError::InvalidInput { fields: offending })
        }
    }

    /// Rejects non-finite readings, naming every offending field.
    pub fn validate(&self) -> Result<(), PredictError> {
        let offending: Vec<String> = FEATURE_COLUMNS
            .iter()
            .zip(self.as_array())
            .filter(|(_, v)| !v.is_finite())
            .map(|(name, _)| (*name).to_string())
            .collect();

        if offending.is_empty() {
            Ok(())
        } else {
            Err(PredictError::InvalidInput { fields: offending })
        }
    }
}

/// A fully observed training row: features plus the energy label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub features: FeatureVector,
    pub energy_delta_wh: f64,
}
