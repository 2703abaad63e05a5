//! Error types for the forge-provider crate.

/// Errors from a single provider attempt.
///
/// All of these are transient from the orchestrator's point of view: it
/// records them and falls back to the next model in the priority list.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error: {0}")]
    ApiError(String),

    /// Stream parsing error or unusable stream payload
    #[error("Stream error: {0}")]
    StreamError(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Provider call exceeded its time budget
    #[error("Timed out: {0}")]
    Timeout(String),
}
