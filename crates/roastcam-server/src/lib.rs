#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! HTTP endpoint layer for Roastcam

mod error;
mod health;
mod models;
mod roast;
mod state;
mod upload;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use roastcam_config::Config;
use roastcam_gateway::{GeminiGateway, Upstream};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use error::{MODELS_ERROR_FALLBACK, RouteError, SERVER_ERROR_FALLBACK};
pub use roast::{ROAST_PROMPT, RoastResponse};
pub use state::AppState;
pub use upload::{PHOTO_FIELD, UploadedImage};

/// Port used when no listen address is configured
pub const DEFAULT_PORT: u16 = 3000;

const MODELS_PATH: &str = "/models";
const ROAST_PATH: &str = "/roast";

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server with the Gemini gateway
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid (including a missing
    /// credential), the gateway cannot be built, or the upload directory
    /// cannot be created
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;

        let gateway = GeminiGateway::new(&config.gemini)
            .map_err(|e| anyhow::anyhow!("failed to initialize Gemini gateway: {e}"))?;

        Self::with_upstream(config, Arc::new(gateway))
    }

    /// Build the server around any upstream implementation
    ///
    /// # Errors
    ///
    /// Returns an error if the health route collides with a relay route or
    /// the upload directory cannot be created
    pub fn with_upstream(config: &Config, upstream: Arc<dyn Upstream>) -> anyhow::Result<Self> {
        let server_config = &config.server;
        let health_config = &server_config.health;

        anyhow::ensure!(
            !health_config.enabled || (health_config.path != MODELS_PATH && health_config.path != ROAST_PATH),
            "health route {} collides with a relay route",
            health_config.path
        );

        let listen_address = server_config
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)));

        std::fs::create_dir_all(&server_config.upload_dir).map_err(|e| {
            anyhow::anyhow!(
                "failed to create upload directory {}: {e}",
                server_config.upload_dir.display()
            )
        })?;

        let state = AppState::new(upstream, server_config.upload_dir.clone());

        let body_limit = server_config
            .upload_limit_bytes
            .map_or_else(DefaultBodyLimit::disable, DefaultBodyLimit::max);

        let mut app = Router::new()
            .route(MODELS_PATH, get(models::list_models))
            .route(ROAST_PATH, post(roast::roast).layer(body_limit));

        if health_config.enabled {
            app = app.route(&health_config.path, get(health::health_handler));
        }

        let app = app
            .fallback_service(ServeDir::new(&server_config.public_dir))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        tracing::debug!(
            public_dir = %server_config.public_dir.display(),
            upload_dir = %server_config.upload_dir.display(),
            model = %config.gemini.model,
            "server initialized"
        );

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Override the listen address
    #[must_use]
    pub fn with_listen_address(mut self, listen_address: SocketAddr) -> Self {
        self.listen_address = listen_address;
        self
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
