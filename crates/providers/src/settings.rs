//! Provider endpoint configuration.
//!
//! Base URLs are overridable so tests and self-hosted gateways can stand in
//! for the real services.

pub const DEFAULT_FAL_QUEUE_URL: &str = "https://queue.fal.run";
pub const DEFAULT_FAL_RUN_URL: &str = "https://fal.run";
pub const DEFAULT_REPLICATE_URL: &str = "https://api.replicate.com/v1";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_VOICEMAKER_URL: &str = "https://developer.voicemaker.in";
pub const DEFAULT_GOOGLE_TTS_URL: &str = "https://texttospeech.googleapis.com/v1";
pub const DEFAULT_FIRECRAWL_URL: &str = "https://api.firecrawl.dev/v1";
pub const DEFAULT_SUPADATA_URL: &str = "https://api.supadata.ai/v1";

/// Base URL plus optional API key for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

/// Endpoints for every provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub fal_queue: Endpoint,
    pub fal_run: Endpoint,
    pub replicate: Endpoint,
    pub openai: Endpoint,
    pub voicemaker: Endpoint,
    pub google_tts: Endpoint,
    pub firecrawl: Endpoint,
    pub supadata: Endpoint,
}

impl Default for ProviderSettings {
    /// Public endpoints with no keys configured.
    fn default() -> Self {
        Self {
            fal_queue: Endpoint::new(DEFAULT_FAL_QUEUE_URL, None),
            fal_run: Endpoint::new(DEFAULT_FAL_RUN_URL, None),
            replicate: Endpoint::new(DEFAULT_REPLICATE_URL, None),
            openai: Endpoint::new(DEFAULT_OPENAI_URL, None),
            voicemaker: Endpoint::new(DEFAULT_VOICEMAKER_URL, None),
            google_tts: Endpoint::new(DEFAULT_GOOGLE_TTS_URL, None),
            firecrawl: Endpoint::new(DEFAULT_FIRECRAWL_URL, None),
            supadata: Endpoint::new(DEFAULT_SUPADATA_URL, None),
        }
    }
}
