// src/llm/provider/mod.rs
// Completion provider trait and request/response types
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::types::{Message, Role};

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

/// Message format sent to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for ChatMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
        }
    }
}

/// Fixed sampling parameters applied to every completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>, settings: &CompletionSettings) -> Self {
        Self {
            model: settings.model.clone(),
            messages,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }

    /// Content of the leading system message, if any
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }
}

/// Candidate completions; only the first one is ever used
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionResponse {
    pub choices: Vec<Option<String>>,
}

impl CompletionResponse {
    pub fn single(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Some(content.into())],
        }
    }

    /// First candidate's content, when present and non-empty
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.as_deref())
            .filter(|c| !c.is_empty())
    }
}

/// Hosted chat-completion API
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name for logging/debugging
    fn name(&self) -> &'static str;

    /// One completion call. No retries.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}
