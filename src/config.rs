//! # Configuration
//!
//! `auth-admin` is configured entirely through the environment. Two variables
//! are required and have no defaults:
//!
//! - `SUPABASE_URL`: base address of the identity backend, e.g.
//!   `https://project.supabase.co`
//! - `SUPABASE_SECRET_KEY`: the privileged service key used for admin calls
//!
//! A variable that is set to the empty string counts as missing.
//!
//! Values may also come from a `.env` file, see [`load_env_file`]. Variables
//! already present in the process environment win over the file.
//!
//! ## Usage
//!
//! ```
//! use auth_admin::config::{Config, SUPABASE_SECRET_KEY, SUPABASE_URL};
//!
//! let config = Config::from_lookup(|key| match key {
//!     SUPABASE_URL => Some("https://example.supabase.co".to_string()),
//!     SUPABASE_SECRET_KEY => Some("service-role-key".to_string()),
//!     _ => None,
//! })
//! .unwrap();
//!
//! assert_eq!(config.url(), "https://example.supabase.co");
//! ```

use std::env;
use std::fmt;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};

/// Environment variable holding the identity backend base URL.
pub const SUPABASE_URL: &str = "SUPABASE_URL";

/// Environment variable holding the identity backend secret key.
pub const SUPABASE_SECRET_KEY: &str = "SUPABASE_SECRET_KEY";

/// Connection settings for the identity backend.
///
/// Both fields are guaranteed non-empty; the only way to obtain a `Config` is
/// through [`Config::from_env`] or [`Config::from_lookup`].
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    url: String,
    secret_key: String,
}

impl Config {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// Every missing variable is collected before returning, so the error
    /// names all of them at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let url = fetch(SUPABASE_URL);
        let secret_key = fetch(SUPABASE_SECRET_KEY);

        match (url, secret_key) {
            (Some(url), Some(secret_key)) => Ok(Self { url, secret_key }),
            (url, secret_key) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push(SUPABASE_URL);
                }
                if secret_key.is_none() {
                    missing.push(SUPABASE_SECRET_KEY);
                }
                Err(Error::MissingConfig { missing })
            }
        }
    }

    /// Base URL of the identity backend.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Administrative secret key. Never log this.
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Load variables from a `.env` file into the process environment.
///
/// With `path = None` the file `.env` is searched for from the current
/// directory upwards; not finding one is fine. An explicit `path` must exist
/// and parse. Existing variables are never overwritten.
pub fn load_env_file(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| Error::EnvFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            debug!("Loaded environment from {}", path.display());
        }
        None => match dotenvy::dotenv() {
            Ok(found) => debug!("Loaded environment from {}", found.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => {
                return Err(Error::EnvFile {
                    path: ".env".to_string(),
                    message: e.to_string(),
                })
            }
        },
    }
    Ok(())
}
