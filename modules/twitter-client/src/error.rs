use chrono::{DateTime, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TwitterError>;

#[derive(Debug, Error)]
pub enum TwitterError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited (window resets at {reset:?})")]
    RateLimited { reset: Option<DateTime<Utc>> },

    #[error("Unexpected content type: {0}")]
    ContentType(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Tweet has no string id_str field")]
    MissingId,

    #[error("Invalid tweet id: {0:?}")]
    InvalidId(String),
}

impl TwitterError {
    /// True for errors caused by a response whose shape or content is wrong,
    /// as opposed to the request failing to complete.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            TwitterError::ContentType(_)
                | TwitterError::Decode(_)
                | TwitterError::MissingId
                | TwitterError::InvalidId(_)
        )
    }
}

impl From<reqwest::Error> for TwitterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TwitterError::Decode(err.to_string())
        } else {
            TwitterError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TwitterError {
    fn from(err: serde_json::Error) -> Self {
        TwitterError::Decode(err.to_string())
    }
}
