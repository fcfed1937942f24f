// src/api/mod.rs

pub mod error;
pub mod http;
pub mod types;

// Re-export commonly used items for external convenience
pub use error::{ApiError, ApiResult};
pub use http::{AppState, create_router};
pub use types::*;
