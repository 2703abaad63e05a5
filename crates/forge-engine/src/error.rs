//! Error types for the forge-engine crate.

/// Errors surfaced to the request handler.
///
/// Individual provider failures stay inside the orchestrator; only the
/// exhaustion of the whole priority list is fatal for a request.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Every model in the priority list failed; carries the last error.
    #[error("all providers exhausted: {detail}")]
    AllProvidersExhausted { detail: String },

    /// The priority list is empty.
    #[error("no models configured")]
    NoModels,

    /// No API key available for the configured provider.
    #[error("missing API key: set {0}")]
    MissingApiKey(String),
}
