use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use roastcam_gateway::GatewayError;
use serde::Serialize;
use thiserror::Error;

/// Message used when `/roast` fails without a usable description
pub const SERVER_ERROR_FALLBACK: &str = "Server error";

/// Message used when `/models` fails without a usable description
pub const MODELS_ERROR_FALLBACK: &str = "Failed to fetch models";

/// Failures surfaced by the route handlers
#[derive(Debug, Error)]
pub enum RouteError {
    /// Request carried no `photo` file part
    #[error("No photo uploaded")]
    NoPhoto,

    /// Multipart body could not be read
    #[error("{message}")]
    InvalidUpload { status: StatusCode, message: String },

    /// Temp file could not be written or read back
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Upstream provider call failed
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl RouteError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoPhoto => StatusCode::BAD_REQUEST,
            Self::InvalidUpload { status, .. } => *status,
            Self::Io(_) | Self::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The error's own description, or `fallback` when it has none
    pub fn client_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }

    /// Attach the route-specific fallback message
    pub fn with_fallback(self, fallback: &'static str) -> RouteFailure {
        RouteFailure { error: self, fallback }
    }
}

/// A route error paired with the message used when it has no description
#[derive(Debug)]
pub struct RouteFailure {
    error: RouteError,
    fallback: &'static str,
}

impl From<RouteError> for RouteFailure {
    fn from(error: RouteError) -> Self {
        error.with_fallback(SERVER_ERROR_FALLBACK)
    }
}

/// `{ "error": "..." }`
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for RouteFailure {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = ErrorBody {
            error: self.error.client_message(self.fallback),
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        RouteFailure::from(self).into_response()
    }
}
