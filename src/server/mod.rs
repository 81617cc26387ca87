//! Thin HTTP surface over the answer pipeline.

pub mod feedback;
mod handlers;
pub mod models;

use std::path::PathBuf;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::ollama::client::OllamaClient;
use crate::pipeline::search::WebSearch;
use crate::serpapi::client::SerpApiClient;

/// Browser origin of the chat frontend.
const ALLOWED_ORIGIN: &str = "http://localhost:3000";

#[derive(Clone)]
pub struct AppState {
    pub chat: OllamaClient,
    pub search: WebSearch<SerpApiClient>,
    pub feedback_dir: PathBuf,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static(ALLOWED_ORIGIN))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/chat", post(handlers::chat))
        .route("/api/feedback", post(handlers::feedback))
        .with_state(state)
        .layer(cors)
        .layer(CatchPanicLayer::new())
}
