use serde::Serialize;

/// Wire envelope for `/predict`.
///
/// Serializes to `{"status":"success","predicted_energy_wh":...}` or
/// `{"status":"error","message":...}`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PredictResponse {
    Success { predicted_energy_wh: f64 },
    Error { message: String },
}

impl PredictResponse {
    pub fn success(predicted_energy_wh: f64) -> Self {
        Self::Success { predicted_energy_wh }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let json = serde_json::to_value(PredictResponse::success(734.2)).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["predicted_energy_wh"], 734.2);
    }

    #[test]
    fn error_envelope_shape() {
        let json = serde_json::to_value(PredictResponse::error("bad input")).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "bad input");
    }
}
