//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use roastcam_config::{Config, GeminiConfig, HealthConfig, ServerConfig};
use secrecy::SecretString;
use tempfile::TempDir;

/// Config plus the scratch directories it points at
///
/// The directories are removed when this value is dropped.
pub struct TestConfig {
    pub config: Config,
    root: TempDir,
}

impl TestConfig {
    pub fn upload_dir(&self) -> PathBuf {
        self.root.path().join("uploads")
    }
}

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
    root: TempDir,
}

impl ConfigBuilder {
    /// Minimal defaults with scratch upload and public directories
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("temp dir");
        let public_dir = root.path().join("public");
        std::fs::create_dir_all(&public_dir).expect("public dir");

        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    public_dir,
                    upload_dir: root.path().join("uploads"),
                    upload_limit_bytes: None,
                    health: HealthConfig::default(),
                },
                gemini: GeminiConfig {
                    api_key: Some(SecretString::from("test-key")),
                    ..GeminiConfig::default()
                },
                telemetry: None,
            },
            root,
        }
    }

    /// Point the gateway at a mock backend
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.gemini.base_url = Some(base_url.parse().expect("valid URL"));
        self
    }

    /// Override the generation model
    pub fn with_model(mut self, model: &str) -> Self {
        model.clone_into(&mut self.config.gemini.model);
        self
    }

    /// Remove the credential
    pub fn without_api_key(mut self) -> Self {
        self.config.gemini.api_key = None;
        self
    }

    /// Cap upload size
    pub fn with_upload_limit(mut self, bytes: usize) -> Self {
        self.config.server.upload_limit_bytes = Some(bytes);
        self
    }

    /// Move the health endpoint
    pub fn with_health_path(mut self, path: &str) -> Self {
        path.clone_into(&mut self.config.server.health.path);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Write a static asset into the public directory
    pub fn with_public_file(self, relative: &str, contents: &str) -> Self {
        let path = self.config.server.public_dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("asset dir");
        }
        std::fs::write(&path, contents).expect("asset file");
        self
    }

    /// Build the final config
    pub fn build(self) -> TestConfig {
        TestConfig {
            config: self.config,
            root: self.root,
        }
    }
}

/// Files currently left in a directory
pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok().map(|e| e.path())).collect())
        .unwrap_or_default()
}
