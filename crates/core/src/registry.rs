//! Static provider registry for the dispatch routes.
//!
//! Each generation capability has a table mapping a provider key to the
//! sibling route that implements it and the models that route accepts.
//! Dispatch routes validate against this table before forwarding.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A kind of generation the platform can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    TextToVideo,
    ImageToVideo,
    TextToImage,
    TextToSpeech,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::TextToVideo,
        Capability::ImageToVideo,
        Capability::TextToImage,
        Capability::TextToSpeech,
    ];

    /// URL path segment, e.g. `text-to-video`.
    pub fn slug(self) -> &'static str {
        match self {
            Self::TextToVideo => "text-to-video",
            Self::ImageToVideo => "image-to-video",
            Self::TextToImage => "text-to-image",
            Self::TextToSpeech => "text-to-speech",
        }
    }

    /// Storage folder that artifacts of this capability are persisted under.
    pub fn storage_folder(self) -> &'static str {
        match self {
            Self::TextToVideo | Self::ImageToVideo => "generated-videos",
            Self::TextToImage => "generated-images",
            Self::TextToSpeech => "generated-audio",
        }
    }

    /// The provider table for this capability.
    pub fn providers(self) -> &'static [ProviderEntry] {
        match self {
            Self::TextToVideo => TEXT_TO_VIDEO,
            Self::ImageToVideo => IMAGE_TO_VIDEO,
            Self::TextToImage => TEXT_TO_IMAGE,
            Self::TextToSpeech => TEXT_TO_SPEECH,
        }
    }
}

/// One row of a provider table.
#[derive(Debug, PartialEq, Eq)]
pub struct ProviderEntry {
    /// Provider key as sent in the `provider` request field.
    pub key: &'static str,
    /// Path of the sub-route the dispatcher forwards to.
    pub forward_path: &'static str,
    /// Accepted model identifiers. The first one is the default.
    pub models: &'static [&'static str],
}

impl ProviderEntry {
    pub fn default_model(&self) -> &'static str {
        self.models[0]
    }

    pub fn supports_model(&self, model: &str) -> bool {
        self.models.contains(&model)
    }

    /// Resolve an optional requested model against the allow-list.
    pub fn resolve_model(&self, requested: Option<&str>) -> Result<&'static str, CoreError> {
        match requested {
            None => Ok(self.default_model()),
            Some(m) => self
                .models
                .iter()
                .copied()
                .find(|candidate| *candidate == m)
                .ok_or_else(|| CoreError::unsupported("model", m, self.models.iter())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

static TEXT_TO_VIDEO: &[ProviderEntry] = &[
    ProviderEntry {
        key: "fal",
        forward_path: "/api/text-to-video/providers/fal",
        models: &[
            "fal-ai/kling-video/v1.6/standard/text-to-video",
            "fal-ai/minimax/video-01",
            "fal-ai/hunyuan-video",
            "fal-ai/ltx-video",
        ],
    },
    ProviderEntry {
        key: "replicate",
        forward_path: "/api/text-to-video/providers/replicate",
        models: &["minimax/video-01", "luma/ray", "kwaivgi/kling-v1.6-standard"],
    },
];

static IMAGE_TO_VIDEO: &[ProviderEntry] = &[
    ProviderEntry {
        key: "fal",
        forward_path: "/api/image-to-video/providers/fal",
        models: &[
            "fal-ai/kling-video/v1.6/standard/image-to-video",
            "fal-ai/minimax/video-01/image-to-video",
            "fal-ai/ltx-video/image-to-video",
        ],
    },
    ProviderEntry {
        key: "replicate",
        forward_path: "/api/image-to-video/providers/replicate",
        models: &["kwaivgi/kling-v1.6-standard", "wavespeedai/wan-2.1-i2v-480p"],
    },
];

static TEXT_TO_IMAGE: &[ProviderEntry] = &[
    ProviderEntry {
        key: "openai",
        forward_path: "/api/text-to-image/providers/openai",
        models: &["dall-e-3", "gpt-image-1"],
    },
    ProviderEntry {
        key: "fal",
        forward_path: "/api/text-to-image/providers/fal",
        models: &["fal-ai/flux/schnell", "fal-ai/flux/dev", "fal-ai/recraft-v3"],
    },
];

static TEXT_TO_SPEECH: &[ProviderEntry] = &[
    ProviderEntry {
        key: "voicemaker",
        forward_path: "/api/text-to-speech/providers/voicemaker",
        models: &["neural", "standard"],
    },
    ProviderEntry {
        key: "google",
        forward_path: "/api/text-to-speech/providers/google",
        models: &["Neural2", "WaveNet", "Standard"],
    },
];

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Find a provider entry by key.
pub fn find_provider(capability: Capability, key: &str) -> Option<&'static ProviderEntry> {
    capability.providers().iter().find(|p| p.key == key)
}

/// Provider keys registered for a capability, in table order.
pub fn provider_keys(capability: Capability) -> Vec<&'static str> {
    capability.providers().iter().map(|p| p.key).collect()
}

/// Validate a dispatch request's `provider` and optional `model` fields.
///
/// Returns the matching entry. A missing provider is a validation error; an
/// unknown provider or model is [`CoreError::Unsupported`] listing the
/// valid set.
pub fn resolve(
    capability: Capability,
    provider: Option<&str>,
    model: Option<&str>,
) -> Result<&'static ProviderEntry, CoreError> {
    let key = match provider {
        Some(k) if !k.trim().is_empty() => k,
        _ => {
            return Err(CoreError::Validation(format!(
                "'provider' is required. Valid providers: {}",
                provider_keys(capability).join(", ")
            )))
        }
    };

    let entry = find_provider(capability, key)
        .ok_or_else(|| CoreError::unsupported("provider", key, provider_keys(capability)))?;

    if let Some(m) = model {
        entry.resolve_model(Some(m))?;
    }

    Ok(entry)
}
