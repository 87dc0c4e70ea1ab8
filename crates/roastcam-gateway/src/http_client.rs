use std::time::Duration;

use reqwest::Client;

use crate::error::{GatewayError, Result};

/// Build the pooled client shared by every upstream call
///
/// No request timeout is set; calls wait as long as the transport allows.
pub(crate) fn build_client() -> Result<Client> {
    let mut headers = http::HeaderMap::new();
    headers.insert(http::header::CONNECTION, http::HeaderValue::from_static("keep-alive"));

    Client::builder()
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .default_headers(headers)
        .build()
        .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {e}")))
}
