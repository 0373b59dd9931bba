use serde::Deserialize;

/// Body of `GET /model-info`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelInfo {
    pub model_loaded: bool,
    pub assignment: String,
    pub location: String,
    #[serde(default)]
    features_count: Option<u32>,
    /// Explanation sent by the service when it runs without a trained model.
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub model_metadata: Option<serde_json::Value>,
}

impl ModelInfo {
    /// Number of engineered features; only meaningful for a loaded model.
    pub fn features_count(&self) -> Option<u32> {
        self.features_count.filter(|_| self.model_loaded)
    }
}
