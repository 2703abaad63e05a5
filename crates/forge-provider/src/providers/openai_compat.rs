//! Generic OpenAI-compatible provider.
//!
//! Handles the OpenAI chat completions API format used by OpenAI,
//! OpenRouter, Together, Ollama, and many other providers.

use crate::error::ProviderError;
use crate::traits::Provider;
use crate::types::{ProviderEvent, Request};
use crate::wire::SseDecoder;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

/// Configuration for an OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    pub base_url: String,
    pub api_key: String,
    pub provider_name: String,
    pub model: String,
}

/// A provider that speaks the OpenAI chat completions protocol.
pub struct OpenAiCompatProvider {
    config: OpenAiCompatConfig,
    client: Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider bound to one model.
    pub fn new(config: OpenAiCompatConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Build the JSON request body.
    fn build_request_body(&self, request: &Request, stream: bool) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
            .collect();

        let mut body = json!({
            "model": self.config.model,
            "messages": messages,
            "stream": stream,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }

    /// Map one SSE data payload to normalized events.
    fn parse_sse_payload(data: &str) -> Vec<ProviderEvent> {
        if data == "[DONE]" {
            return vec![ProviderEvent::Done];
        }

        let chunk: OpenAiChunk = match serde_json::from_str(data) {
            Ok(c) => c,
            Err(err) => {
                // A single undecodable payload never fails the session.
                warn!(error = %err, "skipping malformed stream payload");
                return vec![];
            }
        };

        if let Some(error) = chunk.error {
            return vec![ProviderEvent::Error(error.message)];
        }

        let mut events = Vec::new();
        for choice in &chunk.choices {
            let delta = choice.delta.as_ref().and_then(|d| d.content.as_deref());
            // Some providers occasionally send a full message envelope
            // instead of an incremental delta.
            let full = choice.message.as_ref().and_then(|m| m.content.as_deref());

            if let Some(content) = delta.or(full) {
                if !content.is_empty() {
                    events.push(ProviderEvent::Content(content.to_string()));
                }
            }

            if choice.finish_reason.is_some() {
                events.push(ProviderEvent::Done);
            }
        }

        events
    }

    fn payloads_to_events(payloads: Vec<String>) -> Vec<Result<ProviderEvent, ProviderError>> {
        payloads
            .iter()
            .flat_map(|payload| Self::parse_sse_payload(payload))
            .map(Ok)
            .collect()
    }

    async fn post(&self, body: &Value) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(ProviderError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::ApiError(format!("HTTP {status}: {body}")));
        }

        Ok(response)
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.config.provider_name
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn stream(
        &self,
        request: Request,
    ) -> Result<BoxStream<'_, Result<ProviderEvent, ProviderError>>, ProviderError> {
        let body = self.build_request_body(&request, true);
        let response = self.post(&body).await?;

        // The trailing `None` lets the decoder flush a final payload that
        // arrived without a terminating newline.
        let event_stream = response
            .bytes_stream()
            .map(Some)
            .chain(stream::once(futures::future::ready(None)))
            .scan(SseDecoder::new(), |decoder, item| {
                let events = match item {
                    Some(Ok(bytes)) => Self::payloads_to_events(decoder.push(&bytes)),
                    Some(Err(e)) => vec![Err(ProviderError::Http(e))],
                    None => Self::payloads_to_events(decoder.finish()),
                };
                futures::future::ready(Some(stream::iter(events)))
            })
            .flatten();

        Ok(event_stream.boxed())
    }

    async fn complete(&self, request: Request) -> Result<String, ProviderError> {
        let body = self.build_request_body(&request, false);
        let response = self.post(&body).await?;

        let resp: OpenAiResponse = response.json().await.map_err(ProviderError::Http)?;

        resp.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.clone())
            .ok_or_else(|| {
                ProviderError::StreamError("response missing message content".to_string())
            })
    }
}

// — OpenAI response types for deserialization —

#[derive(Debug, Deserialize)]
struct OpenAiChunk {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    error: Option<OpenAiError>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    #[serde(default)]
    delta: Option<OpenAiMessage>,
    #[serde(default)]
    message: Option<OpenAiMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}
