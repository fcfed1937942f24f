// src/llm/mod.rs
// LLM module exports and submodule declarations

pub mod provider;

pub use provider::{
    ChatMessage, CompletionProvider, CompletionRequest, CompletionResponse, CompletionSettings,
    OpenAiCompatProvider,
};
