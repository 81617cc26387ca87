use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Accepted for wire compatibility with the frontend; the pipeline is
    /// single-turn and never reads past messages.
    #[serde(default)]
    pub conversation_history: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// One submitted rating over a full conversation, written to disk verbatim.
/// Conversation entries are opaque to the backend.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub conversation: Vec<serde_json::Value>,
    /// true = helpful, false = not helpful
    pub rating: bool,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub status: &'static str,
    pub message: &'static str,
}
