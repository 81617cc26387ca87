use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::ollama::client::{ChatClient, ResponseFormat};

/// Relative time window vocabulary the extraction model answers in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TimeUnit {
    #[serde(rename = "jour")]
    Day,
    #[serde(rename = "semaine")]
    Week,
    #[serde(rename = "mois")]
    Month,
    #[serde(rename = "an")]
    Year,
    #[serde(rename = "any")]
    Any,
}

impl TimeUnit {
    fn qdr_code(self) -> Option<&'static str> {
        match self {
            TimeUnit::Day => Some("d"),
            TimeUnit::Week => Some("w"),
            TimeUnit::Month => Some("m"),
            TimeUnit::Year => Some("y"),
            TimeUnit::Any => None,
        }
    }
}

/// A search query plus its time window. Invariant: `time_value == 0` iff
/// `time_unit == Any`; `parse_intent` repairs model replies that break it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIntent {
    pub query: String,
    pub time_unit: TimeUnit,
    pub time_value: u32,
}

impl SearchIntent {
    /// Identity intent: the raw question, no time window.
    pub fn unfiltered(question: &str) -> Self {
        Self {
            query: question.to_string(),
            time_unit: TimeUnit::Any,
            time_value: 0,
        }
    }

    /// Google relative-date token for the provider, e.g. `qdr:d`, `qdr:w3`.
    /// The quantity suffix only appears past one unit; `None` when the intent
    /// carries no window.
    pub fn time_filter(&self) -> Option<String> {
        let code = self.time_unit.qdr_code()?;
        if self.time_value > 1 {
            Some(format!("qdr:{code}{}", self.time_value))
        } else {
            Some(format!("qdr:{code}"))
        }
    }
}

/// Wire shape of the extraction model's JSON reply.
#[derive(Debug, Deserialize)]
struct ExtractedParams {
    requete: Option<String>,
    unite_temps: Option<TimeUnit>,
    #[serde(default)]
    valeur_temps: u32,
}

fn system_prompt(today: NaiveDate) -> String {
    format!(
        r#"Tu es un expert dans l'analyse de requêtes utilisateur pour un moteur de recherche web.
Ta tâche est d'extraire une requête de recherche concise et des paramètres de temps optionnels. Tes requêtes ne doivent pas contenir de sites web.
Les unités de temps possibles sont : "jour", "semaine", "mois", "an", ou "any".
La date actuelle est {today}.

- Si aucune durée spécifique n'est mentionnée, utilise "any" pour l'unité et 0 pour la valeur.
- Si une durée est mentionnée (ex: "les 3 derniers jours", "cette semaine", "le mois dernier"), extrais la valeur numérique et l'unité de temps correspondante. "Cette semaine" ou "la semaine dernière" équivaut à 1 semaine.

Réponds avec un objet JSON contenant trois clés : "requete", "unite_temps", et "valeur_temps" et ne dit rien d'autre.
Exemples :
Utilisateur: "Quelles sont les annonces de Google sur les ordinateurs quantiques des 3 derniers jours ?"
{{"requete": "annonces Google ordinateurs quantiques", "unite_temps": "jour", "valeur_temps": 3}}

Utilisateur: "Les nouveautés de la semaine sur React."
{{"requete": "nouveautés React", "unite_temps": "semaine", "valeur_temps": 1}}

Utilisateur: "Histoire de France"
{{"requete": "Histoire de France", "unite_temps": "any", "valeur_temps": 0}}"#
    )
}

fn parse_intent(raw: &str, question: &str) -> Result<SearchIntent, serde_json::Error> {
    let params: ExtractedParams = serde_json::from_str(raw)?;
    let query = params
        .requete
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| question.to_string());
    // Repair replies that break `value == 0 iff unit == any`: a zero value
    // with a concrete unit (or a missing unit) is no usable window.
    let (time_unit, time_value) = match params.unite_temps.unwrap_or(TimeUnit::Any) {
        TimeUnit::Any => (TimeUnit::Any, 0),
        _ if params.valeur_temps == 0 => (TimeUnit::Any, 0),
        unit => (unit, params.valeur_temps),
    };
    Ok(SearchIntent {
        query,
        time_unit,
        time_value,
    })
}

/// Turn a free-text question into a search intent via the extraction model.
/// Never fails: any chat or parse error degrades to the identity intent, so
/// the pipeline falls back to an unfiltered search of the raw question.
pub async fn extract(chat: &impl ChatClient, question: &str) -> SearchIntent {
    let prompt = system_prompt(Local::now().date_naive());
    let raw = match chat.chat(&prompt, question, ResponseFormat::Json).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "intent extraction failed, searching the raw question");
            return SearchIntent::unfiltered(question);
        }
    };
    match parse_intent(&raw, question) {
        Ok(intent) => {
            debug!(
                query = %intent.query,
                unit = ?intent.time_unit,
                value = intent.time_value,
                "intent extracted"
            );
            intent
        }
        Err(e) => {
            warn!(error = %e, "unparseable extraction reply, searching the raw question");
            SearchIntent::unfiltered(question)
        }
    }
}
