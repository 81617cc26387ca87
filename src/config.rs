use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_FEEDBACK_DIR: &str = "feedback";
const DEFAULT_QUOTA_PATH: &str = "serpapi_counter.json";

/// Server settings, all overridable from the environment. API endpoints and
/// model names live with their clients (`OLLAMA_URL`, `OLLAMA_MODEL`,
/// `SERPAPI_KEY`).
#[derive(Debug)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub feedback_dir: PathBuf,
    pub quota_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid VEILLE_ADDR `{value}`: {source}")]
    BadAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: parse_addr(&env_or("VEILLE_ADDR", DEFAULT_ADDR))?,
            feedback_dir: env_or("VEILLE_FEEDBACK_DIR", DEFAULT_FEEDBACK_DIR).into(),
            quota_path: env_or("VEILLE_QUOTA_PATH", DEFAULT_QUOTA_PATH).into(),
        })
    }
}

fn parse_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|source| ConfigError::BadAddr {
        value: value.to_string(),
        source,
    })
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
