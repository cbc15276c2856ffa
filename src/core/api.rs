//! REST client for the `DegreeAdmin` backend
//!
//! The backend is optional. Without an `[api] endpoint` the client refuses to build and
//! callers stay on the offline flows.

use crate::config::ApiConfig;
use crate::core::auth::{Authenticator, Credentials, LoginError};
use crate::core::models::{Notification, User};
use crate::core::notifications::NotificationStore;
use crate::core::requests::CoopRequest;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Time allowed for a single request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised by backend calls
#[derive(Debug, Error)]
pub enum ApiError {
    /// No endpoint is configured
    #[error("no API endpoint configured (set it with `degreeadmin config set endpoint <url>`)")]
    NotConfigured,
    /// Transport or decoding failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status
    #[error("{method} {path} returned {status}")]
    Status {
        /// HTTP method
        method: Method,
        /// Request path
        path: String,
        /// Response status
        status: StatusCode,
    },
}

impl ApiError {
    /// Status code of a rejected request
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

/// Blocking client for the backend REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    endpoint: String,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client for `endpoint`, sending `token` as a bearer token when present
    ///
    /// # Errors
    /// Returns [`ApiError::NotConfigured`] for an empty endpoint, or an error if the HTTP
    /// client cannot be created.
    pub fn new(endpoint: &str, token: Option<&str>) -> Result<Self, ApiError> {
        let endpoint = endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(ApiError::NotConfigured);
        }
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            token: token.filter(|t| !t.is_empty()).map(str::to_string),
        })
    }

    /// Build a client from the `[api]` config section
    ///
    /// # Errors
    /// See [`ApiClient::new`].
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.endpoint, Some(config.token.as_str()))
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Absolute URL of `path`
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    /// Exchange credentials for the user record
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let body = LoginBody {
            username: &credentials.username,
            password: &credentials.password,
        };
        let response = self.send(Method::POST, "/auth/login", |req| req.json(&body))?;
        Ok(response.json()?)
    }

    /// Fetch the signed-in user's notifications
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status or a malformed body.
    pub fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let response = self.send(Method::GET, "/notifications", |req| req)?;
        Ok(response.json()?)
    }

    /// Mark one notification as read on the server
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub fn mark_read(&self, id: i64) -> Result<(), ApiError> {
        self.send(Method::PATCH, &format!("/notifications/{id}/read"), |req| req)?;
        Ok(())
    }

    /// Mark every notification as read on the server
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub fn mark_all_read(&self) -> Result<(), ApiError> {
        self.send(Method::PATCH, "/notifications/read-all", |req| req)?;
        Ok(())
    }

    /// Post a co-op request for review
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub fn submit_coop_request(&self, request: &CoopRequest) -> Result<(), ApiError> {
        self.send(Method::POST, "/coop-requests", |req| req.json(request))?;
        Ok(())
    }

    fn send<F>(&self, method: Method, path: &str, build: F) -> Result<Response, ApiError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let mut request = self.http.request(method.clone(), self.url(path));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        crate::debug!("{method} {}", self.url(path));

        let response = build(request).send().inspect_err(|e| {
            crate::error!("{method} {path} failed: {e}");
        })?;
        let status = response.status();
        if !status.is_success() {
            crate::warn!("{method} {path} returned {status}");
            return Err(ApiError::Status {
                method,
                path: path.to_string(),
                status,
            });
        }
        Ok(response)
    }
}

impl Authenticator for ApiClient {
    fn authenticate(&self, credentials: &Credentials) -> Result<User, LoginError> {
        match self.login(credentials) {
            Ok(user) => Ok(user),
            Err(e) if matches!(e.status(), Some(StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND)) => {
                Err(LoginError::Rejected)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Replace the store contents with the server's list
///
/// Returns the number of notifications received.
///
/// # Errors
/// Returns an error if the list cannot be fetched; the store is left untouched.
pub fn sync_notifications(store: &NotificationStore, client: &ApiClient) -> Result<usize, ApiError> {
    let items = client.notifications()?;
    let count = items.len();
    store.set_items_from_server(items);
    crate::info!("Synced {count} notification(s) from {}", client.endpoint());
    Ok(count)
}
