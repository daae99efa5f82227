//! The SnooNotes client and its authenticated request builder

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use std::sync::Arc;
use tracing::debug;

use crate::cache::{ConfigCache, TokenStore};
use crate::config::ClientConfig;
use crate::error::{Result, SnooNotesError};
use crate::transport::{ApiRequest, HttpResponse, ReqwestTransport, RequestBody, Transport};

/// Client for the SnooNotes API
///
/// Owns the token store and the subreddit config cache, so everything a
/// client learns lives exactly as long as the client. Share it behind an
/// `Arc` to use it from several tasks.
pub struct SnooNotes {
    pub(crate) config: ClientConfig,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) tokens: TokenStore,
    pub(crate) configs: ConfigCache,
}

impl std::fmt::Debug for SnooNotes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnooNotes")
            .field("config", &self.config)
            .field("tokens", &self.tokens)
            .field("configs", &self.configs)
            .finish_non_exhaustive()
    }
}

impl SnooNotes {
    /// Creates a client for the public service with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client using `reqwest` with the given configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client that sends every request through `transport`
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let configs = ConfigCache::with_ttl(config.config_ttl);
        Self {
            config,
            transport,
            tokens: TokenStore::new(),
            configs,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Credentials of every user that has authenticated through this client
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Subreddit settings fetched through this client
    pub fn configs(&self) -> &ConfigCache {
        &self.configs
    }

    /// Builds a request to `path` authorized as `username`
    ///
    /// Refreshes the user's token first if it has expired. POST requests get
    /// a JSON content type.
    ///
    /// # Errors
    /// * `NoSuchUser` if `username` never authenticated
    /// * `Auth` if the token expired and could not be refreshed
    pub async fn authed_request(
        &self,
        operation: &'static str,
        username: &str,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<ApiRequest> {
        let credential = self.ensure_fresh(username).await?;

        let mut headers = HeaderMap::new();
        if method == Method::POST {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        let authorization = HeaderValue::from_str(&credential.authorization()).map_err(|e| {
            SnooNotesError::Auth {
                username: username.to_string(),
                reason: format!("token is not a valid header value: {e}"),
            }
        })?;
        headers.insert(AUTHORIZATION, authorization);

        let url = self.config.url(path);
        debug!(username, method = %method, url = %url, "authed request created");

        Ok(ApiRequest {
            operation,
            method,
            url,
            headers,
            body,
        })
    }

    /// Sends a request and rejects non-2xx responses
    pub(crate) async fn send(&self, request: ApiRequest) -> Result<HttpResponse> {
        let operation = request.operation;
        self.transport
            .execute(request)
            .await?
            .error_for_status(operation)
    }
}
