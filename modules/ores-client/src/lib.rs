pub mod error;
pub mod types;

pub use error::{OresError, Result};
pub use types::{ClassScore, ModelEntry, ModelError, QualityScores, RawScore, ScoresResponse};

use std::time::Duration;

use tracing::debug;

const DAMAGING: &str = "damaging";
const GOODFAITH: &str = "goodfaith";
const WP10: &str = "wp10";
const DRAFTQUALITY: &str = "draftquality";

pub struct OresClient {
    client: reqwest::Client,
    base_url: String,
    context: String,
}

impl OresClient {
    /// `context` is the wiki the models were trained on, e.g. `enwiki`.
    pub fn new(base_url: &str, context: &str, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            context: context.to_string(),
        }
    }

    /// Fetch the four quality-prediction scores for a revision.
    pub async fn scores(&self, rev_id: u64) -> Result<QualityScores> {
        debug!(rev_id, context = self.context.as_str(), "Score lookup");

        let url = format!("{}/v3/scores/{}/{}", self.base_url, self.context, rev_id);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(OresError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        let body: ScoresResponse = serde_json::from_str(&text)?;
        extract_scores(body, &self.context, rev_id)
    }
}

/// Pull the four named model scores for one revision out of a response.
fn extract_scores(body: ScoresResponse, context: &str, rev_id: u64) -> Result<QualityScores> {
    let context_entry = body
        .contexts
        .get(context)
        .ok_or_else(|| OresError::Parse(format!("response has no {context} context")))?;

    let models = context_entry
        .scores
        .get(&rev_id.to_string())
        .ok_or_else(|| OresError::Parse(format!("response has no scores for revision {rev_id}")))?;

    Ok(QualityScores {
        damaging_true: true_probability(models, DAMAGING)?,
        goodfaith_true: true_probability(models, GOODFAITH)?,
        wp10: class_score(models, WP10)?,
        draftquality: class_score(models, DRAFTQUALITY)?,
    })
}

fn model_score<'a>(
    models: &'a ModelMap,
    model: &str,
) -> Result<&'a RawScore> {
    let entry = models
        .get(model)
        .ok_or_else(|| OresError::Parse(format!("response has no {model} model")))?;

    if let Some(ref err) = entry.error {
        return Err(OresError::ScoreUnavailable {
            model: model.to_string(),
            message: if err.message.is_empty() {
                err.kind.clone()
            } else {
                err.message.clone()
            },
        });
    }

    entry.score.as_ref().ok_or_else(|| {
        OresError::Parse(format!("{model} entry has neither score nor error"))
    })
}

/// Probability of the `true` class, for the boolean models.
fn true_probability(models: &ModelMap, model: &str) -> Result<f64> {
    let score = model_score(models, model)?;
    score
        .probability
        .get("true")
        .copied()
        .ok_or_else(|| OresError::Parse(format!("{model} score has no true probability")))
}

/// Prediction label plus full distribution, for the class-label models.
fn class_score(models: &ModelMap, model: &str) -> Result<ClassScore> {
    let score = model_score(models, model)?;
    let prediction = score
        .prediction
        .as_str()
        .ok_or_else(|| OresError::Parse(format!("{model} prediction is not a class label")))?
        .to_string();

    Ok(ClassScore {
        prediction,
        probabilities: score.probability.clone(),
    })
}

/// model name -> score or error, for one revision.
type ModelMap = std::collections::BTreeMap<String, ModelEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    const SCORED: &str = r#"{
        "enwiki": {
            "models": {
                "damaging": {"version": "0.5.1"},
                "draftquality": {"version": "0.2.1"},
                "goodfaith": {"version": "0.5.1"},
                "wp10": {"version": "0.9.2"}
            },
            "scores": {
                "787926574": {
                    "damaging": {"score": {"prediction": false, "probability": {"false": 0.972, "true": 0.028}}},
                    "goodfaith": {"score": {"prediction": true, "probability": {"false": 0.009, "true": 0.991}}},
                    "wp10": {"score": {"prediction": "FA", "probability": {"B": 0.06, "C": 0.02, "FA": 0.82, "GA": 0.08, "Start": 0.01, "Stub": 0.01}}},
                    "draftquality": {"score": {"prediction": "OK", "probability": {"OK": 0.98, "attack": 0.001, "spam": 0.009, "vandalism": 0.01}}}
                }
            }
        }
    }"#;

    const REVISION_NOT_FOUND: &str = r#"{
        "enwiki": {
            "scores": {
                "999999999999": {
                    "damaging": {"error": {"message": "RevisionNotFound: Could not find revision ({revision}:999999999999)", "type": "RevisionNotFound"}},
                    "goodfaith": {"error": {"message": "RevisionNotFound: Could not find revision ({revision}:999999999999)", "type": "RevisionNotFound"}},
                    "wp10": {"error": {"message": "RevisionNotFound: Could not find revision ({revision}:999999999999)", "type": "RevisionNotFound"}},
                    "draftquality": {"error": {"message": "RevisionNotFound: Could not find revision ({revision}:999999999999)", "type": "RevisionNotFound"}}
                }
            }
        }
    }"#;

    #[test]
    fn scored_revision_extracts_all_four_models() {
        let body: ScoresResponse = serde_json::from_str(SCORED).unwrap();
        let scores = extract_scores(body, "enwiki", 787926574).unwrap();

        assert!((scores.damaging_true - 0.028).abs() < 1e-9);
        assert!((scores.goodfaith_true - 0.991).abs() < 1e-9);
        assert_eq!(scores.wp10.prediction, "FA");
        assert_eq!(scores.wp10.probabilities.len(), 6);
        assert_eq!(scores.draftquality.prediction, "OK");
    }

    #[test]
    fn model_error_is_score_unavailable() {
        let body: ScoresResponse = serde_json::from_str(REVISION_NOT_FOUND).unwrap();
        let err = extract_scores(body, "enwiki", 999999999999).unwrap_err();

        match err {
            OresError::ScoreUnavailable { model, message } => {
                assert_eq!(model, "damaging");
                assert!(message.contains("RevisionNotFound"));
            }
            other => panic!("expected ScoreUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn wrong_context_is_a_parse_error() {
        let body: ScoresResponse = serde_json::from_str(SCORED).unwrap();
        let err = extract_scores(body, "dewiki", 787926574).unwrap_err();
        assert!(matches!(err, OresError::Parse(_)));
    }

    #[test]
    fn missing_revision_key_is_a_parse_error() {
        let body: ScoresResponse = serde_json::from_str(SCORED).unwrap();
        let err = extract_scores(body, "enwiki", 12345).unwrap_err();
        assert!(matches!(err, OresError::Parse(_)));
    }
}
