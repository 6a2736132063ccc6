//! Main catalog API client.

use crate::auth::AuthClient;
use crate::entries::EntriesClient;
use crate::error::{ClientError, Result};
use crate::session::{Route, Session, SessionHolder};
use crate::types::ClientConfig;
use marquee_core::{Credentials, SignupRequest};
use reqwest::Client;
use std::time::Duration;

/// Client for the catalog REST API.
///
/// The session is injected rather than looked up globally; every catalog
/// request reads the current token from it at send time.
///
/// # Example
///
/// ```ignore
/// use marquee_client::{CatalogClient, ClientConfig, SessionHolder};
/// use marquee_core::{Credentials, EntryFilter};
///
/// let client = CatalogClient::new(
///     ClientConfig::new("https://catalog.example.com/api"),
///     SessionHolder::in_memory(),
/// )?;
///
/// client.login(&Credentials::new("ana@example.com", "secret1")).await?;
/// let page = client.entries().list(&EntryFilter::default(), 20, 0).await?;
/// println!("{} of {} entries", page.len(), page.total);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
    session: SessionHolder,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig, session: SessionHolder) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Marquee/{}", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Request)?;

        Ok(Self {
            http,
            base_url: url,
            session,
        })
    }

    /// Get the normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The injected session.
    pub fn session(&self) -> &SessionHolder {
        &self.session
    }

    /// Check if a token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_signed_in()
    }

    /// Auth endpoints (unauthenticated).
    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(&self.http, &self.base_url)
    }

    /// Catalog endpoints, carrying the current token if there is one.
    pub fn entries(&self) -> EntriesClient<'_> {
        EntriesClient::new(&self.http, &self.base_url, self.session.token())
    }

    /// Create an account. Does not sign in.
    pub async fn signup(&self, request: &SignupRequest) -> Result<()> {
        self.auth().signup(request).await
    }

    /// Login and store token and profile in the session.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let response = self.auth().login(credentials).await?;
        self.session.store_login(response)
    }

    /// Clear the session. Returns the route to navigate to.
    pub fn logout(&self) -> Result<Route> {
        self.session.logout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        let new = |url: &str| CatalogClient::new(ClientConfig::new(url), SessionHolder::in_memory());

        assert!(new("https://example.com").is_ok());
        assert!(new("http://localhost:3000/api").is_ok());

        assert!(new("").is_err());
        assert!(new("not-a-url").is_err());
        assert!(new("ftp://example.com").is_err());
    }

    #[test]
    fn test_url_normalization() {
        let client = CatalogClient::new(
            ClientConfig::new("https://example.com/api///"),
            SessionHolder::in_memory(),
        )
        .expect("valid url");

        assert_eq!(client.base_url(), "https://example.com/api");
    }
}
