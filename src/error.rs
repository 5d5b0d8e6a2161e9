//! # Error Handling
//!
//! This module defines the centralized error type for `auth-admin`. It uses
//! the `thiserror` library to describe every failure the library can report
//! before or while talking to the identity backend.
//!
//! Remote rejections (duplicate email, malformed address, ...) are *not*
//! errors at this level: the backend answered, and the answer is carried as
//! [`crate::admin::RemoteError`]. Everything here either stops the program
//! before a request is sent or means no answer arrived at all.

use thiserror::Error;

/// Main error type for auth-admin operations
#[derive(Error, Debug)]
pub enum Error {
    /// One or more required environment variables are absent or empty.
    #[error("Missing required configuration: {}", missing.join(", "))]
    MissingConfig { missing: Vec<&'static str> },

    /// An explicitly requested `.env` file could not be loaded.
    #[error("Failed to load env file {path}: {message}")]
    EnvFile { path: String, message: String },

    /// The configured service URL cannot be turned into an admin endpoint.
    #[error("Invalid service endpoint {url}: {message}")]
    InvalidEndpoint { url: String, message: String },

    /// The secret key cannot be sent as an HTTP header value.
    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(#[from] reqwest::header::InvalidHeaderValue),

    /// Transport-level failure talking to the backend, wrapped from `reqwest::Error`.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a success status but a body that is not a user.
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
