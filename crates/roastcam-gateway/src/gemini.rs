//! Google Generative Language API gateway

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Response};
use roastcam_config::GeminiConfig;
use roastcam_telemetry::UpstreamMetrics;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::error::{GatewayError, Result};
use crate::extract::extract_text;
use crate::http_client::build_client;
use crate::protocol::GenerateContentRequest;
use crate::types::GenerationRequest;
use crate::Upstream;

/// Default Google Generative Language API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";

/// Upstream gateway backed by the Gemini REST API
///
/// The API key travels as the `key` query parameter on every request.
pub struct GeminiGateway {
    client: Client,
    base_url: Url,
    api_key: SecretString,
    model: String,
    metrics: UpstreamMetrics,
}

impl GeminiGateway {
    /// Create from Gemini configuration
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Config` if the API key is missing, the default
    /// base URL cannot be parsed, or the HTTP client cannot be built
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| GatewayError::Config("Gemini API key is required".to_string()))?;

        let base_url = match &config.base_url {
            Some(url) => url.clone(),
            None => Url::parse(DEFAULT_BASE_URL).map_err(|e| GatewayError::Config(format!("invalid base URL: {e}")))?,
        };

        Ok(Self {
            client: build_client()?,
            base_url,
            api_key,
            model: config.model.clone(),
            metrics: UpstreamMetrics::new(),
        })
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url.as_str().trim_end_matches('/'))
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.as_str().trim_end_matches('/'),
            self.model
        )
    }

    fn key_query(&self) -> [(&str, &str); 1] {
        [("key", self.api_key.expose_secret())]
    }

    /// Read the body as JSON regardless of status
    async fn read_json(&self, response: Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, model = %self.model, "upstream returned non-success status");
        }

        let body = response.bytes().await.map_err(GatewayError::connection)?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(%status, error = %e, "upstream response is not JSON");
            GatewayError::Decode(format!("invalid JSON in upstream response: {e}"))
        })
    }

    async fn fetch_models(&self) -> Result<Value> {
        let response = self
            .client
            .get(self.models_url())
            .query(&self.key_query())
            .send()
            .await
            .map_err(|e| {
                let err = GatewayError::connection(e);
                tracing::error!(error = %err, "model listing request failed");
                err
            })?;

        self.read_json(response).await
    }

    async fn fetch_roast(&self, request: &GenerationRequest) -> Result<String> {
        let wire_request = GenerateContentRequest::from(request);

        tracing::debug!(
            model = %self.model,
            mime_type = request.mime_type(),
            image_len = request.image_base64().len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.generate_url())
            .query(&self.key_query())
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                let err = GatewayError::connection(e);
                tracing::error!(error = %err, "generateContent request failed");
                err
            })?;

        let body = self.read_json(response).await?;
        tracing::debug!(response = %body, "generateContent response");

        Ok(extract_text(&body))
    }
}

#[async_trait]
impl Upstream for GeminiGateway {
    async fn list_models(&self) -> Result<Value> {
        let start = Instant::now();
        let result = self.fetch_models().await;
        self.metrics.record("list_models", outcome(&result), start);
        result
    }

    async fn generate_roast(&self, request: &GenerationRequest) -> Result<String> {
        let start = Instant::now();
        let result = self.fetch_roast(request).await;
        self.metrics.record("generate_roast", outcome(&result), start);
        result
    }
}

fn outcome<T>(result: &Result<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(GatewayError::Decode(_)) => "decode_error",
        Err(_) => "connection_error",
    }
}
