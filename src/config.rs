//! Client configuration
//!
//! Defaults point at the public SnooNotes service; the `with_*` methods
//! exist for self-hosted instances and tests.

use std::time::Duration;

/// Base URL of the public SnooNotes service
pub const DEFAULT_BASE_URL: &str = "https://snoonotes.com/";

/// OAuth client id that SnooNotes issues to bots
pub const DEFAULT_CLIENT_ID: &str = "bots";

/// Subreddit settings are cached for 24 hours
pub const DEFAULT_CONFIG_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for a [`SnooNotes`](crate::SnooNotes) client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root, always ending in `/`
    pub base_url: String,
    /// `client_id` sent with the password grant
    pub client_id: String,
    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,
    /// User agent sent with every HTTP request
    pub user_agent: String,
    /// How long a subreddit config stays fresh
    pub config_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("snoonotes-rs/", env!("CARGO_PKG_VERSION")).to_string(),
            config_ttl: DEFAULT_CONFIG_TTL,
        }
    }
}

impl ClientConfig {
    /// Use a different service root. A trailing `/` is added if missing.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_config_ttl(mut self, ttl: Duration) -> Self {
        self.config_ttl = ttl;
        self
    }

    /// Joins an endpoint path onto the base URL
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}
