//! Common types used by the provider trait and implementations.

use serde::{Deserialize, Serialize};

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// A message in provider-native chat format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request to a provider.
#[derive(Debug, Clone)]
pub struct Request {
    /// Conversation messages, system first.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens in the response.
    pub max_tokens: Option<usize>,
}

/// A model identifier from the configured priority list.
///
/// Opaque to everything but the provider that serves it; its rank is its
/// position in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model identifier (e.g., "gpt-4o").
    pub id: String,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A normalized event observed from one provider attempt.
///
/// Exists only within that attempt's lifetime; the orchestrator forwards
/// the content and terminal variants downstream once a model is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderEvent {
    /// A chunk of generated text. May be an incremental delta or, for
    /// providers that occasionally emit a full message instead, the whole
    /// text at once — consumers must not assume delta-only semantics.
    Content(String),
    /// In-band provider error.
    Error(String),
    /// Terminal marker.
    Done,
}
