use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::ollama::client::{ChatClient, ResponseFormat};
use crate::serpapi::types::SearchResult;

const APOLOGY: &str =
    "Je suis désolé, j'ai rencontré une erreur lors du traitement des informations.";

/// Context block handed to the model plus the `[N] link` citation lines.
/// Indices line up: `Source N` in the context is `[N]` in the list.
fn build_context(results: &[SearchResult]) -> (String, Vec<String>) {
    let mut context = String::new();
    let mut links = Vec::with_capacity(results.len());
    for (i, result) in results.iter().enumerate() {
        context.push_str(&format!("Source {} :\n{}\n\n", i + 1, result.description));
        links.push(format!("[{}] {}", i + 1, result.link));
    }
    (context, links)
}

fn system_prompt(today: NaiveDate, context: &str) -> String {
    format!(
        r#"Tu es un assistant IA serviable. Ta tâche est de répondre à la question de l'utilisateur en te basant *uniquement* sur le contexte fourni par les sources web.
N'utilise aucune connaissance préalable.
Sois concis et réponds directement à la question.
Liste les sources que tu as utilisées à la fin de ta réponse, formatées comme [1], [2], etc.
La date actuelle est {today}.

Contexte fourni :
{context}"#
    )
}

/// Grounded synthesis over the supplied results. The trailing Sources section
/// lists every supplied link, whether or not the model cited it inline. On a
/// chat failure this returns a fixed apology instead of an error.
pub async fn synthesize(
    chat: &impl ChatClient,
    question: &str,
    results: &[SearchResult],
) -> String {
    let (context, links) = build_context(results);
    let prompt = system_prompt(Local::now().date_naive(), &context);

    let answer = match chat.chat(&prompt, question, ResponseFormat::Text).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!(error = %e, "answer synthesis failed");
            return APOLOGY.to_string();
        }
    };

    debug!(sources = links.len(), "answer synthesized");
    format!("{answer}\n\n**Sources:**\n{}", links.join("\n"))
}
