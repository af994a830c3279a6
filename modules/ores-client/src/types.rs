use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level scores response: wiki context keyed at the root.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoresResponse {
    #[serde(flatten)]
    pub contexts: BTreeMap<String, ContextEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContextEntry {
    /// revision id (as a string key) -> model name -> score or error.
    #[serde(default)]
    pub scores: BTreeMap<String, BTreeMap<String, ModelEntry>>,
}

/// Per-model output. Exactly one of `score`/`error` is present in practice.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub score: Option<RawScore>,
    pub error: Option<ModelError>,
}

/// Raw model score. `prediction` is a class label for wp10/draftquality and
/// a boolean for damaging/goodfaith, hence the untyped value.
#[derive(Debug, Clone, Deserialize)]
pub struct RawScore {
    pub prediction: serde_json::Value,
    #[serde(default)]
    pub probability: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelError {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

/// Prediction plus per-class probability distribution, for the class-label
/// models (wp10, draftquality).
#[derive(Debug, Clone)]
pub struct ClassScore {
    pub prediction: String,
    pub probabilities: BTreeMap<String, f64>,
}

/// The four model outputs consumed by the harvest pipeline.
#[derive(Debug, Clone)]
pub struct QualityScores {
    /// Probability that the revision is damaging.
    pub damaging_true: f64,
    /// Probability that the revision was made in good faith.
    pub goodfaith_true: f64,
    pub wp10: ClassScore,
    pub draftquality: ClassScore,
}
