// src/api/types.rs
// Wire types shared by the chat endpoint and the conversation client

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChatError;

/// Speaker of a message in the conversation timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// One entry of the conversation log. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat` as it arrives on the wire, before validation.
///
/// `message` is kept loose so that a missing or non-string value can be
/// answered with the dedicated invalid-input response instead of a
/// deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RawChatRequest {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default, rename = "conversationHistory")]
    pub conversation_history: Option<Vec<Message>>,
}

/// Validated chat request: `message` is non-empty text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, rename = "conversationHistory")]
    pub conversation_history: Vec<Message>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, conversation_history: Vec<Message>) -> Self {
        Self {
            message: message.into(),
            conversation_history,
        }
    }
}

impl TryFrom<RawChatRequest> for ChatRequest {
    type Error = ChatError;

    fn try_from(raw: RawChatRequest) -> Result<Self, Self::Error> {
        let message = match raw.message {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            _ => return Err(ChatError::InvalidInput),
        };

        // The system instruction is built server-side; callers only supply turns
        let conversation_history = raw
            .conversation_history
            .unwrap_or_default()
            .into_iter()
            .filter(|m| matches!(m.role, Role::User | Role::Assistant))
            .collect();

        Ok(Self {
            message,
            conversation_history,
        })
    }
}

/// Response body of `POST /chat`: either a reply or an error, never both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Reply {
        reply: String,
    },
    Failure {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl ChatResponse {
    pub fn reply(text: impl Into<String>) -> Self {
        ChatResponse::Reply { reply: text.into() }
    }

    pub fn failure(error: impl Into<String>, details: Option<String>) -> Self {
        ChatResponse::Failure {
            error: error.into(),
            details,
        }
    }
}
