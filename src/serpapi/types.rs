use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub organic_results: Vec<OrganicResult>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrganicResult {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
}

/// A normalized organic hit, in engine-ranked order. Fields the provider
/// omitted collapse to empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub description: String,
}

impl From<OrganicResult> for SearchResult {
    fn from(hit: OrganicResult) -> Self {
        Self {
            title: hit.title.unwrap_or_default(),
            link: hit.link.unwrap_or_default(),
            description: hit.snippet.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_empty() {
        let hit = OrganicResult {
            title: None,
            link: Some("https://example.com".into()),
            snippet: None,
        };

        let result = SearchResult::from(hit);
        assert_eq!(result.title, "");
        assert_eq!(result.link, "https://example.com");
        assert_eq!(result.description, "");
    }
}
