//! In-memory transport for unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::client::SnooNotes;
use crate::config::ClientConfig;
use crate::error::{Result, SnooNotesError};
use crate::transport::{ApiRequest, HttpResponse, Transport};

#[derive(Default)]
struct Inner {
    /// Path relative to the base URL -> canned reply
    routes: HashMap<String, std::result::Result<(u16, Vec<u8>), String>>,
    requests: Vec<ApiRequest>,
}

/// Replies with canned responses keyed by path and records every request
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, path: &str, status: u16, body: impl Into<String>) {
        self.inner
            .lock()
            .routes
            .insert(path.to_string(), Ok((status, body.into().into_bytes())));
    }

    /// Makes requests to `path` fail before any response arrives
    pub(crate) fn fail(&self, path: &str, message: &str) {
        self.inner
            .lock()
            .routes
            .insert(path.to_string(), Err(message.to_string()));
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.inner.lock().requests.clone()
    }

    /// Number of requests sent to `path`
    pub(crate) fn count(&self, path: &str) -> usize {
        self.inner
            .lock()
            .requests
            .iter()
            .filter(|r| r.url.ends_with(path))
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<HttpResponse> {
        let mut inner = self.inner.lock();
        let path = request
            .url
            .strip_prefix(BASE_URL)
            .unwrap_or(&request.url)
            .to_string();
        let operation = request.operation;
        inner.requests.push(request);

        match inner.routes.get(&path) {
            Some(Ok((status, body))) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(Err(message)) => Err(SnooNotesError::transport(operation, message)),
            None => Ok(HttpResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}

pub(crate) const BASE_URL: &str = "https://snoonotes.test/";

pub(crate) fn mock_client(transport: &MockTransport) -> SnooNotes {
    let config = ClientConfig::default().with_base_url(BASE_URL);
    SnooNotes::with_transport(config, Arc::new(transport.clone()))
}

pub(crate) fn token_json(access_token: &str, expires_in: u64) -> String {
    format!(r#"{{"access_token":"{access_token}","expires_in":{expires_in},"token_type":"Bearer"}}"#)
}

/// A client with `username` already authenticated
pub(crate) async fn authed_client(transport: &MockTransport, username: &str) -> SnooNotes {
    transport.respond("auth/connect/token", 200, token_json("tok", 3600));
    let client = mock_client(transport);
    client
        .auth(username, "user-key")
        .await
        .expect("auth against mock should succeed");
    client
}
