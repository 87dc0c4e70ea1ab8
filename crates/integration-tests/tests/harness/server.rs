//! Test server wrapper that starts Roastcam on a random port

use std::net::SocketAddr;
use std::path::PathBuf;

use roastcam_server::Server;
use tokio_util::sync::CancellationToken;

use super::config::TestConfig;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
    config: TestConfig,
}

impl TestServer {
    /// Start a test server with the given configuration
    ///
    /// Binds to port 0 for automatic port assignment
    pub async fn start(config: TestConfig) -> anyhow::Result<Self> {
        let server = Server::new(&config.config)?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            shutdown,
            client: reqwest::Client::new(),
            config,
        })
    }

    /// URL of a path on the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.config.upload_dir()
    }

    /// POST a single `photo` file part to `/roast`
    pub async fn roast(&self, bytes: &[u8], mime_type: &str) -> reqwest::Response {
        let part = reqwest::multipart::Part::bytes(bytes.to_vec())
            .file_name("selfie.png")
            .mime_str(mime_type)
            .expect("valid mime type");
        let form = reqwest::multipart::Form::new().part("photo", part);

        self.client
            .post(self.url("/roast"))
            .multipart(form)
            .send()
            .await
            .expect("roast request")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// An address nothing is listening on
pub async fn closed_address() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    listener.local_addr().expect("local addr")
}
