//! HTTP transport used by the client
//!
//! Requests are described by [`ApiRequest`] and executed by a [`Transport`].
//! [`ReqwestTransport`] talks to the network; tests can substitute their own
//! implementation and inspect the requests the client builds.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};

use crate::config::ClientConfig;
use crate::error::{Result, SnooNotesError};

/// Body of an outgoing request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
}

/// A fully built request, ready to send
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Name of the client operation, used in errors and logs
    pub operation: &'static str,
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

/// Status and raw body of a response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fails with a transport error unless the status is 2xx
    pub fn error_for_status(self, operation: &'static str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(SnooNotesError::status(operation, self.status))
        }
    }

    /// Decodes the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self, operation: &'static str) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| SnooNotesError::decode(operation, e))
    }
}

/// Executes requests built by the client
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the response, whatever its status.
    /// Only failures to get a response at all are errors.
    async fn execute(&self, request: ApiRequest) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client with the configured timeout and user agent
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| SnooNotesError::transport("build client", e))?;
        Ok(Self { client })
    }

    /// Wraps an existing `reqwest::Client`
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<HttpResponse> {
        let operation = request.operation;
        let builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(pairs) => builder.form(&pairs),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| SnooNotesError::transport(operation, e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| SnooNotesError::transport(operation, format!("http body read failed: {e}")))?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
