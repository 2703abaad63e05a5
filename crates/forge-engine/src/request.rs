//! Inbound generation requests and provider message building.

use crate::prompts::{render_current_files, GENERATOR_SYSTEM_PROMPT};
use forge_provider::{ChatMessage, ChatRole, Request};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many prior conversation turns are kept when building the provider
/// message list.
pub const HISTORY_WINDOW: usize = 8;

const DEFAULT_MAX_TOKENS: usize = 16_384;

/// One prior conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

/// One user action. Read-only once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The user's prompt.
    pub prompt: String,
    /// Prior turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    /// Existing files for modification requests.
    #[serde(default)]
    pub current_files: Option<BTreeMap<String, String>>,
    /// Whether the caller wants a streamed response.
    #[serde(default)]
    pub stream: bool,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            history: Vec::new(),
            current_files: None,
            stream: false,
        }
    }

    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_current_files(mut self, files: BTreeMap<String, String>) -> Self {
        self.current_files = Some(files);
        self
    }

    pub fn streamed(mut self) -> Self {
        self.stream = true;
        self
    }

    /// Build the provider message list: system prompt, then the most recent
    /// `HISTORY_WINDOW` turns, then the current prompt (with existing files
    /// inlined for modification requests).
    pub fn to_provider_request(&self) -> Request {
        let mut messages = vec![ChatMessage::system(GENERATOR_SYSTEM_PROMPT)];

        let skip = self.history.len().saturating_sub(HISTORY_WINDOW);
        for turn in &self.history[skip..] {
            messages.push(ChatMessage {
                role: turn.role,
                content: turn.text.clone(),
            });
        }

        let prompt = match &self.current_files {
            Some(files) if !files.is_empty() => {
                format!("{}\n\n{}", self.prompt, render_current_files(files))
            }
            _ => self.prompt.clone(),
        };
        messages.push(ChatMessage::user(prompt));

        Request {
            messages,
            max_tokens: Some(DEFAULT_MAX_TOKENS),
        }
    }
}
