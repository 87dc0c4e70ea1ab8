use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

use crate::health::HealthConfig;

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind, `0.0.0.0:3000` when unset
    pub listen_address: Option<SocketAddr>,
    /// Directory served for every unmatched GET path
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    /// Directory holding transient upload files
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Maximum request body size for uploads; unlimited when unset
    #[serde(default)]
    pub upload_limit_bytes: Option<usize>,
    #[serde(default)]
    pub health: HealthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: None,
            public_dir: default_public_dir(),
            upload_dir: default_upload_dir(),
            upload_limit_bytes: None,
            health: HealthConfig::default(),
        }
    }
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}
