use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, info};

use crate::pipeline::engine::{self, AnswerError};

use super::AppState;
use super::models::{ChatRequest, ChatResponse, FeedbackRequest, FeedbackResponse};

const NOT_FOUND_DETAIL: &str =
    "Impossible de trouver des informations pertinentes pour la période spécifiée.";
const INTERNAL_DETAIL: &str = "Une erreur interne du serveur est survenue.";

/// Client-facing failures, serialized as `{"detail": "..."}` bodies. Causes
/// stay in the server log.
pub enum ApiError {
    NotFound,
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_DETAIL),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<AnswerError> for ApiError {
    fn from(e: AnswerError) -> Self {
        match e {
            AnswerError::NotFound => ApiError::NotFound,
        }
    }
}

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!(history = request.conversation_history.len(), "chat request");
    let answer = engine::answer(&state.chat, &state.search, &request.message).await?;
    Ok(Json(ChatResponse { answer }))
}

pub async fn feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    super::feedback::save(&state.feedback_dir, &request).map_err(|e| {
        error!(error = %e, "failed to persist feedback");
        ApiError::Internal
    })?;
    Ok(Json(FeedbackResponse {
        status: "success",
        message: "Feedback bien reçu. Merci !",
    }))
}
