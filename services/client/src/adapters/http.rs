//! services/client/src/adapters/http.rs
//!
//! The shared REST client used by every backend adapter. It attaches the
//! session's bearer token, logs each request, and maps HTTP failures onto
//! `PortError`.

use jobmate_core::ports::{PortError, PortResult};
use jobmate_core::session::SessionHandle;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

//=========================================================================================
// The Client Struct
//=========================================================================================

/// A thin wrapper over `reqwest::Client` bound to one backend and one session.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
}

impl ApiClient {
    /// Creates a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration, session: SessionHandle) -> PortResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::Unexpected(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    //=====================================================================================
    // Verb helpers
    //=====================================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> PortResult<T> {
        self.send_json(self.request(Method::GET, path)).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> PortResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send_json(self.request(Method::GET, path).query(query))
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> PortResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(self.request(Method::POST, path).json(body))
            .await
    }

    /// A POST without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> PortResult<T> {
        self.send_json(self.request(Method::POST, path)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> PortResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(self.request(Method::PATCH, path).json(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> PortResult<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    //=====================================================================================
    // Request plumbing
    //=====================================================================================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("[API Request] {} {}", method, path);
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> PortResult<T> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| PortError::Unexpected(format!("Failed to parse response: {}", e)))
    }

    async fn send(&self, builder: RequestBuilder) -> PortResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(self.classify(status, &path, &body))
    }

    /// Maps a failed response onto the port error taxonomy.
    fn classify(&self, status: StatusCode, path: &str, body: &str) -> PortError {
        let detail = error_detail(body);
        match status {
            StatusCode::UNAUTHORIZED => {
                warn!("{} returned 401; clearing the session", path);
                self.session.logout();
                PortError::Unauthorized(detail)
            }
            StatusCode::NOT_FOUND => PortError::NotFound(detail.unwrap_or_else(|| path.to_string())),
            _ => {
                if status == StatusCode::FORBIDDEN {
                    warn!("Access denied: {}", path);
                } else if status.is_server_error() {
                    error!("Server error occurred: {} returned {}", path, status);
                }
                PortError::Api {
                    status: status.as_u16(),
                    detail,
                }
            }
        }
    }
}

/// Extracts the backend's `detail` field from an error body.
///
/// Validation failures carry a list of `{ "msg": ... }` objects instead of a
/// string; their messages are joined.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}
