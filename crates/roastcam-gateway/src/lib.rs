#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Upstream gateway to the generative provider
//!
//! Builds model-listing and content-generation requests and reduces the
//! provider's variably shaped responses to a single string.

mod error;
pub mod extract;
mod gemini;
mod http_client;
mod protocol;
mod types;

use async_trait::async_trait;
use serde_json::Value;

pub use error::{GatewayError, Result};
pub use extract::{NO_ROAST_PLACEHOLDER, extract_text};
pub use gemini::{DEFAULT_BASE_URL, GeminiGateway};
pub use types::GenerationRequest;

/// Stateless round trips to the upstream provider
///
/// Implementations perform no retries. Only transport failures and
/// non-JSON bodies are errors; an error status with a JSON body is passed
/// through like any other response.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetch the provider's model list, returned exactly as received
    async fn list_models(&self) -> Result<Value>;

    /// Generate a roast for one image
    ///
    /// Yields [`NO_ROAST_PLACEHOLDER`] when the response holds no usable text.
    async fn generate_roast(&self, request: &GenerationRequest) -> Result<String>;
}
