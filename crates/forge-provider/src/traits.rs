//! Provider trait definition.

use crate::error::ProviderError;
use crate::types::{ProviderEvent, Request};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Trait for LLM provider implementations.
///
/// A provider issues exactly one request to one named model, buffered or
/// streamed, and normalizes the reply into [`ProviderEvent`]s. Pure
/// transport: retry and fallback live in the orchestrator.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name (e.g., "openai", "openrouter").
    fn name(&self) -> &str;

    /// The model this provider instance is bound to.
    fn model(&self) -> &str;

    /// Send a streaming request.
    ///
    /// Returns a stream of normalized events as the model generates output.
    async fn stream(
        &self,
        request: Request,
    ) -> Result<BoxStream<'_, Result<ProviderEvent, ProviderError>>, ProviderError>;

    /// Send a buffered request and return the full response text.
    async fn complete(&self, request: Request) -> Result<String, ProviderError>;
}

// Compile-time check: Provider must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn Provider) {}
};
