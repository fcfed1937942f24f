// src/api/http/mod.rs

use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::chat::ContextAssembler;

mod chat;

pub use chat::{chat_handler, chat_status_handler, health_handler};

/// Shared, read-only handler state
#[derive(Clone)]
pub struct AppState {
    pub assembler: ContextAssembler,
}

impl AppState {
    pub fn new(assembler: ContextAssembler) -> Self {
        Self { assembler }
    }
}

/// CORS policy applied to every route, preflight included
pub fn cors_layer(permissive: bool) -> CorsLayer {
    let methods = if permissive {
        vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]
    } else {
        vec![Method::GET, Method::POST, Method::OPTIONS]
    };

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(methods)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Create the router with all endpoints
pub fn create_router(state: AppState, cors_permissive: bool) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", get(chat_status_handler).post(chat_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_permissive)),
        )
        .with_state(state)
}
