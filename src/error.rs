use thiserror::Error;

/// Fallback reason used when the API rejects a request without saying why.
pub const FALLBACK_FAILURE: &str = "Failed to get recommendations";

/// Everything that can go wrong between pressing Enter and showing results.
#[derive(Error, Debug)]
pub enum RecommendError {
    /// Blank song title; caught locally before any request is sent.
    #[error("Please enter a song title.")]
    EmptyTitle,

    /// Non-success HTTP status. Carries the API's `error` text or the fallback.
    #[error("{0}")]
    Api(String),

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl RecommendError {
    /// Validation failures are shown as a blocking alert rather than a result
    /// entry.
    pub fn is_validation(&self) -> bool {
        matches!(self, RecommendError::EmptyTitle)
    }
}
