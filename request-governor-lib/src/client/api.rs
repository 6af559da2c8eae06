use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::envelope::{
    error_message_from_body, extract_response_data, is_auth_status, is_not_found_status,
};
use super::pool::{build_http_client, HttpClient};
use crate::config::ClientConfig;
use crate::error::{GovernorError, Result};
use crate::failure::{messages, Failure};

/// JSON client for the dashboard backend
///
/// Every call either yields the unwrapped payload or a [`Failure`] shaped so
/// the classifier can reduce it: transport problems become
/// `Failure::Error` ("Failed to fetch" / "Request timeout"), non-success
/// statuses become `Failure::Response`.
#[derive(Clone)]
pub struct ApiClient {
    client: HttpClient,
    base_url: String,
    token: Option<String>,
    request_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let uri: Uri = config.base_url.parse()?;
        if uri.authority().is_none() {
            return Err(GovernorError::Http(format!(
                "base url is missing a host: {}",
                config.base_url
            )));
        }

        Ok(Self {
            client: build_http_client(config),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }

    /// Replace the bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = if token.is_empty() { None } else { Some(token) };
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET path`. A 404 yields `Ok(None)`.
    pub async fn get(&self, path: &str) -> std::result::Result<Option<Value>, Failure> {
        self.send(Method::GET, path, None).await
    }

    /// Send a request with an optional JSON body.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> std::result::Result<Option<Value>, Failure> {
        let request = self.build_request(method, path, body)?;
        let uri = request.uri().clone();

        match timeout(self.request_timeout, self.exchange(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%uri, timeout_ms = self.request_timeout.as_millis() as u64, "request timed out");
                Err(Failure::error(format!(
                    "Request timeout after {}ms",
                    self.request_timeout.as_millis()
                )))
            }
        }
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> std::result::Result<Request<Full<Bytes>>, Failure> {
        let url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        let uri: Uri =
            url.parse().map_err(|e| Failure::error(format!("Invalid request url {url}: {e}")))?;

        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let body = match body {
            Some(value) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                let bytes = serde_json::to_vec(value)
                    .map_err(|e| Failure::error(format!("Failed to encode request body: {e}")))?;
                Full::new(Bytes::from(bytes))
            }
            None => Full::new(Bytes::new()),
        };

        builder
            .body(body)
            .map_err(|e| Failure::error(format!("Failed to build request: {e}")))
    }

    async fn exchange(
        &self,
        request: Request<Full<Bytes>>,
    ) -> std::result::Result<Option<Value>, Failure> {
        let method = request.method().clone();
        let uri = request.uri().clone();

        let response = self.client.request(request).await.map_err(|e| {
            warn!(%method, %uri, error = %e, "request failed before a response arrived");
            Failure::error(format!("Failed to fetch: {e}"))
        })?;

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| Failure::error(format!("Failed to fetch: {e}")))?
            .to_bytes();

        debug!(%method, %uri, status = status.as_u16(), len = bytes.len(), "response received");

        let code = status.as_u16();
        if is_not_found_status(code) {
            return Ok(None);
        }

        let body = parse_body(&bytes);

        if is_auth_status(code) {
            let message = body
                .as_ref()
                .and_then(error_message_from_body)
                .unwrap_or_else(|| messages::AUTHENTICATION_FAILED.to_string());
            return Err(Failure::response_with_message(code, message));
        }

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(error_message_from_body)
                .unwrap_or_else(|| status_text(status));
            return Err(Failure::response_with_message(code, message));
        }

        if bytes.is_empty() {
            return Ok(Some(Value::Null));
        }

        match body {
            Some(value) => Ok(Some(extract_response_data(value))),
            None => Err(Failure::error("Invalid JSON in response body")),
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn parse_body(bytes: &Bytes) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes).ok()
}

fn status_text(status: StatusCode) -> String {
    format!("HTTP {}: {}", status.as_u16(), status.canonical_reason().unwrap_or("Unknown"))
}
