use thiserror::Error;

pub type Result<T> = std::result::Result<T, OresError>;

#[derive(Debug, Error)]
pub enum OresError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    /// The service answered but could not score the revision (it does not
    /// exist, or the model rejected it). Distinct from the transport and
    /// parse variants so callers can treat it as a final answer rather than
    /// a retryable failure.
    #[error("Score unavailable from model {model}: {message}")]
    ScoreUnavailable { model: String, message: String },
}

impl From<reqwest::Error> for OresError {
    fn from(err: reqwest::Error) -> Self {
        OresError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for OresError {
    fn from(err: serde_json::Error) -> Self {
        OresError::Parse(err.to_string())
    }
}
