use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::serpapi::client::SearchProvider;
use crate::serpapi::quota::DailyQuota;
use crate::serpapi::types::SearchResult;

use super::intent::SearchIntent;

/// Organic results requested per search.
const RESULT_COUNT: u8 = 10;

/// Quota-gated web search. Every failure mode (exhausted budget, provider
/// error) degrades to an empty result list, so callers only distinguish
/// "results" from "no results".
#[derive(Clone)]
pub struct WebSearch<P> {
    provider: P,
    quota: Arc<DailyQuota>,
}

impl<P: SearchProvider> WebSearch<P> {
    pub fn new(provider: P, quota: Arc<DailyQuota>) -> Self {
        Self { provider, quota }
    }

    pub async fn run(&self, intent: &SearchIntent) -> Vec<SearchResult> {
        if !self.quota.try_consume() {
            warn!("daily search quota reached, returning no results");
            return Vec::new();
        }

        let tbs = intent.time_filter();
        info!(query = %intent.query, tbs = tbs.as_deref().unwrap_or("none"), "searching");

        match self
            .provider
            .query(&intent.query, RESULT_COUNT, tbs.as_deref())
            .await
        {
            Ok(results) => {
                for hit in &results {
                    debug!(title = %hit.title, link = %hit.link, "hit");
                }
                results
            }
            Err(e) => {
                warn!(error = %e, "search provider call failed, returning no results");
                Vec::new()
            }
        }
    }
}
