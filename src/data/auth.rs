//! Password-grant authentication and token refresh
//!
//! SnooNotes issues bot tokens through an OAuth2 password grant where the
//! password is the user key from https://snoonotes.com/#!/userkey. Tokens are
//! not refreshable; an expired one is replaced by authenticating again with
//! the stored key.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::Method;
use tracing::debug;

use super::{Credential, TokenResponse};
use crate::client::SnooNotes;
use crate::error::{Result, SnooNotesError};
use crate::transport::{ApiRequest, RequestBody};

/// Token endpoint, relative to the base URL
const TOKEN_PATH: &str = "auth/connect/token";

impl SnooNotes {
    /// Authenticates `username` with their SnooNotes user key
    ///
    /// On success the credential is stored and used by every later call
    /// made as `username`.
    ///
    /// # Errors
    /// * `Transport` if the token endpoint cannot be reached
    /// * `Auth` if the service rejects the key
    /// * `Decode` if the token response is malformed
    pub async fn auth(&self, username: &str, key: &str) -> Result<()> {
        debug!(action = "Auth", username, "sending auth request");

        let form = vec![
            ("grant_type".to_string(), "password".to_string()),
            ("username".to_string(), username.to_string()),
            ("password".to_string(), key.to_string()),
            ("client_id".to_string(), self.config.client_id.clone()),
        ];
        let request = ApiRequest {
            operation: "Auth",
            method: Method::POST,
            url: self.config.url(TOKEN_PATH),
            headers: HeaderMap::new(),
            body: RequestBody::Form(form),
        };

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            return Err(SnooNotesError::Auth {
                username: username.to_string(),
                reason: format!("http request returned status [{}]", response.status),
            });
        }

        let token: TokenResponse = response.json("Auth")?;
        let credential = Credential::from_response(token, key, Utc::now());

        debug!(action = "Auth", username, expires_at = %credential.expires_at, "got auth token");

        self.tokens.set(username, credential);
        Ok(())
    }

    /// Returns a usable credential for `username`, re-authenticating first
    /// if the stored one has expired
    pub async fn ensure_fresh(&self, username: &str) -> Result<Credential> {
        self.ensure_fresh_at(username, Utc::now()).await
    }

    /// Same as [`ensure_fresh`](Self::ensure_fresh), judging expiry at `now`
    ///
    /// A refresh happens only when `now` is strictly after `expires_at`.
    pub async fn ensure_fresh_at(&self, username: &str, now: DateTime<Utc>) -> Result<Credential> {
        let credential = self.tokens.get(username)?;
        if !credential.is_expired_at(now) {
            return Ok(credential);
        }

        debug!(action = "Refresh", username, "token expired, refreshing");

        self.auth(username, &credential.key)
            .await
            .map_err(|e| SnooNotesError::Auth {
                username: username.to_string(),
                reason: format!("refreshing token failed: {e}"),
            })?;

        self.tokens.get(username)
    }
}
