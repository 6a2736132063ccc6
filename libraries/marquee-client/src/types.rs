//! Client configuration types.

use std::time::Duration;

/// Configuration for connecting to the catalog API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://catalog.example.com/api")
    pub url: String,
    /// Whole-request timeout; `None` lets a request wait indefinitely
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a config with just the URL and no timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
        }
    }

    /// Bound every request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// What a read should do when the server answers 401
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnauthorizedBehavior {
    /// Fail like any other non-2xx response
    #[default]
    Throw,
    /// Treat the caller as signed out and yield no data
    ReturnNone,
}
