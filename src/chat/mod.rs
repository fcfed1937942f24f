// src/chat/mod.rs
// Contextual-answer pipeline

pub mod assembler;
pub mod context;
pub mod prompt;

pub use assembler::{AssemblerSettings, ContextAssembler, FALLBACK_REPLY};
pub use context::{NO_CONTEXT, format_context, format_record};
