use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use crate::Config;

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Config file picked up from the working directory when no path is given
const DEFAULT_CONFIG_FILE: &str = "roastcam.toml";

/// Paths owned by the relay routes
const RESERVED_PATHS: &[&str] = &["/models", "/roast"];

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, fills in the
    /// credential from the environment when the file omits it, then validates.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, expansion or parsing
    /// fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Resolve configuration for process startup
    ///
    /// An explicit path must exist. Without one, `roastcam.toml` in the
    /// working directory is used if present, otherwise the built-in
    /// defaults plus the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the credential is missing
    pub fn discover(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            return Self::load(default_path);
        }

        tracing::debug!("no config file found, using defaults");
        let config = Self::default().with_env_credential();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;
        let config = config.with_env_credential();

        config.validate()?;

        Ok(config)
    }

    /// Take the API key from `GEMINI_API_KEY` unless one is already set
    #[must_use]
    pub fn with_env_credential(mut self) -> Self {
        if self.gemini.api_key.is_none() {
            self.gemini.api_key = std::env::var(API_KEY_ENV).ok().map(SecretString::from);
        }
        self
    }

    /// Validate that the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is missing or empty, or a server
    /// setting is out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_credential()?;
        self.validate_server_config()?;
        Ok(())
    }

    fn validate_credential(&self) -> anyhow::Result<()> {
        let Some(ref api_key) = self.gemini.api_key else {
            anyhow::bail!("missing {API_KEY_ENV}: export it or set gemini.api_key in the config file");
        };

        if api_key.expose_secret().trim().is_empty() {
            anyhow::bail!("{API_KEY_ENV} must not be empty");
        }

        Ok(())
    }

    fn validate_server_config(&self) -> anyhow::Result<()> {
        if !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        if self.server.health.enabled && RESERVED_PATHS.contains(&self.server.health.path.as_str()) {
            anyhow::bail!(
                "server.health.path '{}' collides with a built-in route",
                self.server.health.path
            );
        }

        if self.server.upload_limit_bytes == Some(0) {
            anyhow::bail!("server.upload_limit_bytes must be greater than 0");
        }

        if self.gemini.model.trim().is_empty() {
            anyhow::bail!("gemini.model must not be empty");
        }

        Ok(())
    }
}
