//! CLI configuration
use marquee_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "marquee.toml";

/// Prefix of environment overrides, e.g. `MARQUEE_API_URL`
pub const ENV_PREFIX: &str = "MARQUEE";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Entries requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Where the login token and profile are kept
    #[serde(default = "default_session_path")]
    pub session_path: PathBuf,

    /// Whole-request timeout; 0 disables it
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            session_path: default_session_path(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Settings {
    /// Load configuration from file and environment
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with(path, config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut settings = config::Config::builder();

        // An explicit path must exist; the default file is optional
        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(environment.try_parsing(true));

        let settings: Settings = settings.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "API URL is required (set MARQUEE_API_URL)".to_string(),
            ));
        }

        if self.page_size == 0 {
            return Err(config::ConfigError::Message(
                "page_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.api_url);
        match self.request_timeout() {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }
}

// Default values
fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_page_size() -> u32 {
    marquee_query::DEFAULT_PAGE_SIZE
}

fn default_search_debounce_ms() -> u64 {
    marquee_query::DEFAULT_DEBOUNCE_MS
}

fn default_session_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".marquee").join("session.json"),
        None => PathBuf::from(".marquee-session.json"),
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}
