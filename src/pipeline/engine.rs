use tracing::info;

use crate::ollama::client::ChatClient;
use crate::serpapi::client::SearchProvider;

use super::intent;
use super::search::WebSearch;
use super::synthesize;

#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    /// Search produced no usable results for the requested window.
    #[error("no relevant information found for the requested period")]
    NotFound,
}

/// End-to-end pipeline: extract intent, search under quota, synthesize a
/// grounded answer. The stages absorb their own failures; the only error that
/// crosses this boundary is total result emptiness. No retries, no state.
pub async fn answer(
    chat: &impl ChatClient,
    search: &WebSearch<impl SearchProvider>,
    question: &str,
) -> Result<String, AnswerError> {
    let intent = intent::extract(chat, question).await;
    let results = search.run(&intent).await;
    if results.is_empty() {
        info!(query = %intent.query, "no search results, giving up");
        return Err(AnswerError::NotFound);
    }

    info!(results = results.len(), "synthesizing answer");
    Ok(synthesize::synthesize(chat, question, &results).await)
}
