mod config;
mod ollama;
mod pipeline;
mod serpapi;
mod server;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::info;

use config::Config;
use ollama::client::OllamaClient;
use pipeline::search::WebSearch;
use serpapi::client::SerpApiClient;
use serpapi::quota::{DAILY_LIMIT, DailyQuota};
use server::AppState;

pub const USER_AGENT: &str = concat!("veille/", env!("CARGO_PKG_VERSION"));

/// TCP connection establishment timeout. Request deadlines are set per
/// service by the individual API clients.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("veille=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let http = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
    let chat = OllamaClient::from_env(http.clone());
    let provider = SerpApiClient::from_env(http)
        .inspect_err(|e| tracing::error!("search provider unavailable: {e}"))?;
    let quota = Arc::new(DailyQuota::new(&config.quota_path, DAILY_LIMIT));
    let search = WebSearch::new(provider, quota);

    let app = server::create_router(AppState {
        chat,
        search,
        feedback_dir: config.feedback_dir,
    });

    info!("listening on http://{}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
