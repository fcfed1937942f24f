// src/error.rs
// Failure taxonomy of the chat pipeline

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Missing, empty or non-text `message`. Never retried.
    #[error("Invalid message")]
    InvalidInput,

    /// Knowledge store query failed. The assembler absorbs this and
    /// continues with an empty result set.
    #[error("knowledge store query failed: {0:#}")]
    Retrieval(anyhow::Error),

    /// Completion provider errored, timed out or returned garbage
    #[error("{0:#}")]
    Provider(anyhow::Error),

    /// Client could not reach the chat endpoint or got a non-success answer
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ChatError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        ChatError::Transport(err.to_string())
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
