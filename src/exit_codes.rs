//! Process exit statuses used by the `auth-admin` binary.
//!
//! - `0`: the user was created, or the backend rejected the request and
//!   `--strict` was not given
//! - `1`: missing configuration, missing email, transport failure, or a
//!   rejection under `--strict`
//! - `2`: invalid command-line usage detected by clap (unknown flags)

/// The request was carried out.
pub const SUCCESS: i32 = 0;

/// A gate failed or the backend could not be reached.
pub const ERROR: i32 = 1;

/// Invalid command-line usage, reported by clap before any gate runs.
pub const USAGE: i32 = 2;
