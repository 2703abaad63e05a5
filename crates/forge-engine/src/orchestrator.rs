//! Provider fallback orchestration.
//!
//! Walks an ordered priority list of models. Buffered mode returns the
//! first successful full response. Streamed mode watches each provider for
//! a short grace window and commits to the first one that produces usable
//! output; after commitment there is no further fallback, because partial
//! output has already been delivered downstream.

use crate::config::Config;
use crate::error::EngineError;
use crate::relay::StreamRelay;
use crate::request::GenerationRequest;
use crate::session::StreamSession;
use forge_provider::{
    ModelDescriptor, OpenAiCompatConfig, OpenAiCompatProvider, Provider, ProviderError,
    ProviderEvent,
};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long a just-opened provider stream may stay silent before the
/// orchestrator moves on to the next model.
pub const GRACE_WINDOW: Duration = Duration::from_millis(500);

/// Upper bound on one buffered provider call, and on the gap between
/// consecutive events of a committed stream.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(180);

/// Drives provider attempts against an ordered, read-only priority list.
pub struct Orchestrator {
    providers: Vec<Box<dyn Provider>>,
}

impl Orchestrator {
    pub fn new(providers: Vec<Box<dyn Provider>>) -> Self {
        Self { providers }
    }

    /// Build providers for every model in the configured priority list.
    pub fn from_config(config: &Config) -> Result<Self, EngineError> {
        if config.models.is_empty() {
            return Err(EngineError::NoModels);
        }

        let env_var = format!("{}_API_KEY", config.provider.to_uppercase());
        let api_key =
            std::env::var(&env_var).map_err(|_| EngineError::MissingApiKey(env_var))?;

        let providers = config
            .models
            .iter()
            .map(|model| {
                Box::new(OpenAiCompatProvider::new(OpenAiCompatConfig {
                    base_url: config.base_url.clone(),
                    api_key: api_key.clone(),
                    provider_name: config.provider.clone(),
                    model: model.clone(),
                })) as Box<dyn Provider>
            })
            .collect();

        Ok(Self::new(providers))
    }

    /// The priority list, highest rank first.
    pub fn models(&self) -> Vec<ModelDescriptor> {
        self.providers
            .iter()
            .map(|p| ModelDescriptor::new(p.model()))
            .collect()
    }

    /// Buffered mode: first model to return a full response wins.
    pub async fn complete(&self, request: &GenerationRequest) -> Result<String, EngineError> {
        if self.providers.is_empty() {
            return Err(EngineError::NoModels);
        }

        let mut last_error: Option<String> = None;
        for provider in &self.providers {
            let attempt = tokio::time::timeout(
                PROVIDER_TIMEOUT,
                provider.complete(request.to_provider_request()),
            )
            .await;

            match attempt {
                Ok(Ok(text)) => {
                    debug!(model = provider.model(), "buffered generation succeeded");
                    return Ok(text);
                }
                Ok(Err(err)) => {
                    warn!(model = provider.model(), error = %err, "provider failed, falling back");
                    last_error = Some(err.to_string());
                }
                Err(_) => {
                    let err = ProviderError::Timeout(provider.model().to_string());
                    warn!(model = provider.model(), "provider timed out, falling back");
                    last_error = Some(err.to_string());
                }
            }
        }

        Err(EngineError::AllProvidersExhausted {
            detail: last_error.unwrap_or_else(|| "no providers attempted".to_string()),
        })
    }

    /// Streamed mode: commit to the first model that produces a usable
    /// event within [`GRACE_WINDOW`], then forward its events through the
    /// relay until a terminal condition.
    ///
    /// Caller disconnect before commitment aborts silently with `Ok(())`.
    pub async fn stream(
        &self,
        request: &GenerationRequest,
        relay: &mut StreamRelay,
    ) -> Result<(), EngineError> {
        if self.providers.is_empty() {
            return Err(EngineError::NoModels);
        }

        let mut session = StreamSession::new(self.providers.len());
        let mut last_error: Option<String> = None;

        while let Some(idx) = session.next() {
            if relay.is_closed() {
                session.close();
                debug!(session = %session.id(), "client disconnected before commitment");
                return Ok(());
            }

            let provider = &self.providers[idx];
            session.set_current(provider.model());

            let mut events = match provider.stream(request.to_provider_request()).await {
                Ok(stream) => stream,
                Err(err) => {
                    warn!(model = provider.model(), error = %err, "provider stream failed to open");
                    last_error = Some(err.to_string());
                    continue;
                }
            };

            // Grace window: does this provider start producing output?
            let first = match tokio::time::timeout(GRACE_WINDOW, events.next()).await {
                Err(_) => {
                    debug!(model = provider.model(), "no output within grace window");
                    continue;
                }
                Ok(None) => {
                    debug!(model = provider.model(), "stream ended without events");
                    continue;
                }
                Ok(Some(Err(err))) => {
                    warn!(model = provider.model(), error = %err, "provider errored before commitment");
                    last_error = Some(err.to_string());
                    continue;
                }
                Ok(Some(Ok(ProviderEvent::Error(message)))) => {
                    warn!(model = provider.model(), error = %message, "provider reported error before commitment");
                    last_error = Some(message);
                    continue;
                }
                Ok(Some(Ok(event))) => event,
            };

            if relay.is_closed() {
                session.close();
                return Ok(());
            }

            session.commit();
            info!(
                session = %session.id(),
                model = provider.model(),
                "committed to provider"
            );
            relay.connected(provider.model()).await;
            Self::pump(first, &mut events, relay).await;
            return Ok(());
        }

        let detail = last_error.unwrap_or_else(|| "no provider produced output".to_string());
        relay.error(&format!("generation failed: {detail}")).await;
        relay.finish().await;
        Err(EngineError::AllProvidersExhausted { detail })
    }

    /// Forward events from the committed provider until a terminal
    /// condition: an explicit `Done`, natural end-of-stream, a mid-stream
    /// error or stall (in-band, followed by the terminal sentinel), or
    /// caller disconnect.
    async fn pump(
        first: ProviderEvent,
        events: &mut BoxStream<'_, Result<ProviderEvent, ProviderError>>,
        relay: &mut StreamRelay,
    ) {
        let mut next: Option<Result<ProviderEvent, ProviderError>> = Some(Ok(first));
        loop {
            let Some(event) = next.take() else {
                // Natural end of the provider stream.
                relay.finish().await;
                return;
            };

            if relay.is_closed() {
                // Disconnect: stop forwarding; dropping the stream releases
                // the provider connection.
                return;
            }

            match event {
                Ok(ProviderEvent::Content(text)) => {
                    relay.content(&text).await;
                }
                Ok(ProviderEvent::Done) => {
                    relay.finish().await;
                    return;
                }
                Ok(ProviderEvent::Error(message)) => {
                    // After commitment the consumer already holds partial
                    // output; surface the failure in-band and terminate.
                    relay.error(&message).await;
                    relay.finish().await;
                    return;
                }
                Err(err) => {
                    relay.error(&err.to_string()).await;
                    relay.finish().await;
                    return;
                }
            }

            next = match tokio::time::timeout(PROVIDER_TIMEOUT, events.next()).await {
                Ok(event) => event,
                Err(_) => {
                    // Stalled after commitment: partial output has already
                    // been delivered, so surface the failure in-band.
                    warn!("committed provider stalled mid-stream");
                    relay.error("provider stalled mid-stream").await;
                    relay.finish().await;
                    return;
                }
            };
        }
    }
}
