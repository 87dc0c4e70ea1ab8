use std::path::{Path, PathBuf};
use std::sync::Arc;

use roastcam_gateway::Upstream;

/// Shared handler state, cheap to clone per request
#[derive(Clone)]
pub struct AppState {
    upstream: Arc<dyn Upstream>,
    upload_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(upstream: Arc<dyn Upstream>, upload_dir: PathBuf) -> Self {
        Self {
            upstream,
            upload_dir: Arc::new(upload_dir),
        }
    }

    pub fn upstream(&self) -> &dyn Upstream {
        self.upstream.as_ref()
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }
}
