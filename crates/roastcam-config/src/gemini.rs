use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Model used for roast generation when none is configured
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-002";

/// Google Generative Language API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key, falls back to the `GEMINI_API_KEY` environment variable
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override (defaults to the public `v1` endpoint)
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model identifier used for `generateContent`
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: default_model(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
