use anyhow::{bail, Context, Result};

/// Which persistence backend backs the session store.
/// Selected at deployment time; the rest of the app only sees `SessionStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Optional token for the GitHub REST API (raises the rate limit).
    pub github_token: Option<String>,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is Postgres.
    pub database_url: Option<String>,
    /// Directory uploaded documents are written under, one subdir per session.
    pub upload_dir: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store_backend = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "postgres" => StoreBackend::Postgres,
            other => bail!("STORE_BACKEND must be 'memory' or 'postgres', got '{other}'"),
        };

        let database_url = std::env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL is required when STORE_BACKEND=postgres");
        }

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            github_token: std::env::var("GITHUB_TOKEN").ok(),
            store_backend,
            database_url,
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
