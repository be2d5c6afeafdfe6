use anyhow::{Context, Result};

/// Runtime configuration gathered from the environment (`.env` honored).
///
/// A missing Groq key is a startup error for the server binary, not a
/// request-time surprise; the client-side settings all have local-dev
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the Groq chat-completions upstream.
    pub groq_api_key: String,
    /// Port the collaborator endpoints listen on.
    pub port: u16,
    /// Base URL the session's HTTP collaborator client talks to.
    pub api_base_url: String,
    /// Directory for the durable JSON snapshots.
    pub data_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: std::env::var("GROQ_API_KEY")
                .context("Required environment variable 'GROQ_API_KEY' is not set")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            api_base_url: std::env::var("INTERVUE_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
            data_dir: std::env::var("INTERVUE_DATA_DIR")
                .unwrap_or_else(|_| ".intervue".to_string()),
        })
    }
}
