// src/lib.rs

pub mod api;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod llm;
pub mod server;

pub use config::FolioConfig;
pub use error::{ChatError, ChatResult};
