use std::time::Duration;

use mediaforge_core::polling::{PollPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};
use mediaforge_providers::settings::{
    DEFAULT_FAL_QUEUE_URL, DEFAULT_FAL_RUN_URL, DEFAULT_FIRECRAWL_URL, DEFAULT_GOOGLE_TTS_URL,
    DEFAULT_OPENAI_URL, DEFAULT_REPLICATE_URL, DEFAULT_SUPADATA_URL, DEFAULT_VOICEMAKER_URL,
};
use mediaforge_providers::{Endpoint, ProviderSettings};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except
/// `JWT_SECRET`. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Timeout for ordinary requests in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Timeout for generation routes in seconds (default: `960`). Must cover
    /// the whole poll budget.
    pub generation_timeout_secs: u64,
    /// Base URL dispatch routes forward to (default: `http://127.0.0.1:{PORT}`).
    pub internal_base_url: String,
    /// Bearer token validation.
    pub jwt: JwtConfig,
    /// Durable object storage.
    pub storage: StorageConfig,
    /// Provider endpoints and API keys.
    pub providers: ProviderSettings,
    /// Poll cadence for queue-based providers.
    pub poll: PollPolicy,
}

/// Supabase storage settings. Without URL and key, generated media is not
/// persisted and responses carry the provider URLs.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub supabase_url: Option<String>,
    pub service_key: Option<String>,
    pub bucket: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:3001`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `GENERATION_TIMEOUT_SECS` | `960`                      |
    /// | `INTERNAL_BASE_URL`       | `http://127.0.0.1:{PORT}`  |
    /// | `SUPABASE_URL`            | unset (no persistence)     |
    /// | `SUPABASE_SERVICE_KEY`    | unset                      |
    /// | `STORAGE_BUCKET`          | `media`                    |
    /// | `POLL_INTERVAL_SECS`      | `5`                        |
    /// | `POLL_MAX_ATTEMPTS`       | `180`                      |
    ///
    /// Provider keys: `FAL_KEY`, `REPLICATE_API_TOKEN`, `OPENAI_API_KEY`,
    /// `VOICEMAKER_API_KEY`, `GOOGLE_TTS_API_KEY`, `FIRECRAWL_API_KEY`,
    /// `SUPADATA_API_KEY`. Each provider's base URL can be overridden with
    /// the matching `*_BASE_URL` variable.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let generation_timeout_secs: u64 = std::env::var("GENERATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "960".into())
            .parse()
            .expect("GENERATION_TIMEOUT_SECS must be a valid u64");

        let internal_base_url = std::env::var("INTERNAL_BASE_URL")
            .unwrap_or_else(|_| format!("http://127.0.0.1:{port}"))
            .trim_end_matches('/')
            .to_string();

        let storage = StorageConfig {
            supabase_url: optional_var("SUPABASE_URL"),
            service_key: optional_var("SUPABASE_SERVICE_KEY"),
            bucket: std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "media".into()),
        };

        let poll_interval_secs: u64 = std::env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_POLL_INTERVAL.as_secs().to_string())
            .parse()
            .expect("POLL_INTERVAL_SECS must be a valid u64");

        let poll_max_attempts: u32 = std::env::var("POLL_MAX_ATTEMPTS")
            .unwrap_or_else(|_| DEFAULT_MAX_ATTEMPTS.to_string())
            .parse()
            .expect("POLL_MAX_ATTEMPTS must be a valid u32");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            generation_timeout_secs,
            internal_base_url,
            jwt: JwtConfig::from_env(),
            storage,
            providers: providers_from_env(),
            poll: PollPolicy {
                interval: Duration::from_secs(poll_interval_secs),
                max_attempts: poll_max_attempts,
            },
        }
    }
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn endpoint(base_var: &str, default_base: &str, key_var: &str) -> Endpoint {
    Endpoint::new(
        std::env::var(base_var).unwrap_or_else(|_| default_base.to_string()),
        optional_var(key_var),
    )
}

fn providers_from_env() -> ProviderSettings {
    ProviderSettings {
        fal_queue: endpoint("FAL_QUEUE_BASE_URL", DEFAULT_FAL_QUEUE_URL, "FAL_KEY"),
        fal_run: endpoint("FAL_RUN_BASE_URL", DEFAULT_FAL_RUN_URL, "FAL_KEY"),
        replicate: endpoint("REPLICATE_BASE_URL", DEFAULT_REPLICATE_URL, "REPLICATE_API_TOKEN"),
        openai: endpoint("OPENAI_BASE_URL", DEFAULT_OPENAI_URL, "OPENAI_API_KEY"),
        voicemaker: endpoint("VOICEMAKER_BASE_URL", DEFAULT_VOICEMAKER_URL, "VOICEMAKER_API_KEY"),
        google_tts: endpoint("GOOGLE_TTS_BASE_URL", DEFAULT_GOOGLE_TTS_URL, "GOOGLE_TTS_API_KEY"),
        firecrawl: endpoint("FIRECRAWL_BASE_URL", DEFAULT_FIRECRAWL_URL, "FIRECRAWL_API_KEY"),
        supadata: endpoint("SUPADATA_BASE_URL", DEFAULT_SUPADATA_URL, "SUPADATA_API_KEY"),
    }
}
