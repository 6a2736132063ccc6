//! Signup and login endpoints.

use crate::error::Result;
use crate::request::{endpoint, read_json, send};
use marquee_core::{Credentials, LoginResponse, SignupRequest};
use reqwest::{Client, Method};
use tracing::{debug, info};

/// Authentication client for the catalog API.
///
/// These endpoints never carry a bearer token.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Create an account. The response body is ignored.
    pub async fn signup(&self, request: &SignupRequest) -> Result<()> {
        let url = endpoint(self.base_url, "/signup")?;
        debug!(url = %url, email = %request.email, "Creating account");

        send(self.http, Method::POST, url, None, Some(request)).await?;

        info!(email = %request.email, "Account created");
        Ok(())
    }

    /// Exchange credentials for a token and profile.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let url = endpoint(self.base_url, "/login")?;
        debug!(url = %url, email = %credentials.email, "Attempting login");

        let response = send(self.http, Method::POST, url, None, Some(credentials)).await?;
        let login: LoginResponse = read_json(response, "login response").await?;

        info!(email = %login.user.email, "Login successful");
        Ok(login)
    }
}
