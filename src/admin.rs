//! # Identity Backend Client
//!
//! The identity backend is reached through a single administrative operation:
//! create a user by email, optionally marking the address as already
//! confirmed. This module defines that operation as the [`IdentityBackend`]
//! trait and provides [`HttpBackend`], the implementation that talks to a
//! GoTrue-compatible admin API (`POST <url>/auth/v1/admin/users`).
//!
//! ## Two kinds of failure
//!
//! [`IdentityBackend::create_user`] returns a nested result:
//!
//! - the outer [`crate::error::Result`] fails when no usable answer arrived
//!   (connection refused, TLS failure, undecodable success body)
//! - the inner [`CreateUserResult`] is the backend's verdict, either the new
//!   [`User`] or a [`RemoteError`] with a human-readable message
//!
//! Callers treat the two differently: a rejection is reported and the
//! program carries on, a transport failure aborts.
//!
//! No retries are attempted and no timeout is configured beyond the HTTP
//! client's defaults.

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};

/// Path of the admin user collection, relative to the service URL.
pub const ADMIN_USERS_PATH: &str = "auth/v1/admin/users";

/// Request body for the create-user operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub email: String,
    /// Mark the email as verified, skipping the confirmation workflow.
    pub email_confirm: bool,
}

impl NewUser {
    /// A request for `email` that the backend should treat as confirmed.
    pub fn auto_confirmed(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            email_confirm: true,
        }
    }
}

/// The subset of the backend's user record that this tool reports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

/// The backend declined the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    /// HTTP status of the rejection.
    pub status: u16,
    pub message: String,
}

/// The backend's verdict on a create-user request.
pub type CreateUserResult = std::result::Result<User, RemoteError>;

/// The administrative operations consumed from the identity backend.
pub trait IdentityBackend {
    /// Create `user` in the backend. Called once per invocation.
    fn create_user(&self, user: &NewUser) -> Result<CreateUserResult>;
}

/// [`IdentityBackend`] over the backend's HTTP admin API.
pub struct HttpBackend {
    client: Client,
    endpoint: Url,
}

impl HttpBackend {
    /// Build a client bound to the configured endpoint and secret.
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = admin_users_endpoint(config.url())?;
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(auth_headers(config.secret_key())?)
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// The fully resolved create-user URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl IdentityBackend for HttpBackend {
    fn create_user(&self, user: &NewUser) -> Result<CreateUserResult> {
        debug!("POST {} (email_confirm={})", self.endpoint, user.email_confirm);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(user)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        debug!("Backend answered {}", status);

        parse_response(status, &body)
    }
}

/// `apikey` and bearer headers carrying the secret, marked sensitive so
/// they are redacted from debug output.
fn auth_headers(secret_key: &str) -> Result<HeaderMap> {
    let mut apikey = HeaderValue::from_str(secret_key)?;
    apikey.set_sensitive(true);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {secret_key}"))?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert("apikey", apikey);
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}

/// Resolve the create-user endpoint below a service base URL.
///
/// A base URL with a path prefix keeps it; the trailing slash is optional.
pub fn admin_users_endpoint(base: &str) -> Result<Url> {
    let invalid = |message: String| Error::InvalidEndpoint {
        url: base.to_string(),
        message,
    };

    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    url.join(ADMIN_USERS_PATH).map_err(|e| invalid(e.to_string()))
}

/// Turn a status and body into the backend's verdict.
pub fn parse_response(status: StatusCode, body: &str) -> Result<CreateUserResult> {
    if status.is_success() {
        let user = match serde_json::from_str::<UserBody>(body)? {
            UserBody::Wrapped { user } => user,
            UserBody::Bare(user) => user,
        };
        return Ok(Ok(user));
    }

    Ok(Err(RemoteError {
        status: status.as_u16(),
        message: error_message(status, body),
    }))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserBody {
    Wrapped { user: User },
    Bare(User),
}

/// Pick the human-readable message out of an error body.
///
/// GoTrue has used several shapes over time, so the first of `msg`,
/// `message`, `error_description` and `error` (string or `{message}`) wins.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["msg", "message", "error_description"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
        match value.get("error") {
            Some(Value::String(message)) => return message.clone(),
            Some(nested) => {
                if let Some(message) = nested.get("message").and_then(Value::as_str) {
                    return message.to_string();
                }
            }
            None => {}
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}
