#![allow(clippy::must_use_candidate)]

mod env;
pub mod gemini;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use gemini::*;
pub use health::*;
pub use loader::API_KEY_ENV;
pub use server::*;
pub use telemetry::TelemetryConfig;

/// Top-level Roastcam configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP listener, static assets and upload handling
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream Gemini API settings, including the credential
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
