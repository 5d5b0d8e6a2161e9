//! # Create-User Flow
//!
//! The whole program is one straight line with two early exits:
//!
//! 1. **Configuration gate**: both credentials must be present.
//! 2. **Argument gate**: an email must be given.
//! 3. **Remote call**: connect to the backend and create the user, once.
//! 4. **Report**: print the new user, or the backend's rejection.
//!
//! [`run`] implements that sequence over injectable pieces (configuration,
//! backend constructor, output streams) so every branch can be exercised
//! without a network or a child process. The binary wires in the real
//! environment, [`HttpBackend::new`](crate::admin::HttpBackend::new) and the
//! process's stdout/stderr.

use std::io::Write;

use log::debug;

use crate::admin::{IdentityBackend, NewUser, RemoteError, User};
use crate::config::{Config, SUPABASE_SECRET_KEY, SUPABASE_URL};
use crate::error::{Error, Result};
use crate::exit_codes;

/// Name shown in the usage line.
pub const PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");

/// Where the flow writes its messages.
pub struct Console<O, E> {
    pub out: O,
    pub err: E,
}

impl<O: Write, E: Write> Console<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }
}

/// How a single invocation ended, short of a transport failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A required environment variable was absent or empty.
    ConfigMissing,
    /// No email argument was supplied.
    UsageError,
    /// The backend created the user.
    Created(User),
    /// The backend declined the request.
    Rejected(RemoteError),
}

impl Outcome {
    /// Process exit status for this outcome.
    ///
    /// A rejection exits successfully unless `strict` is set.
    pub fn exit_code(&self, strict: bool) -> i32 {
        match self {
            Outcome::ConfigMissing | Outcome::UsageError => exit_codes::ERROR,
            Outcome::Created(_) => exit_codes::SUCCESS,
            Outcome::Rejected(_) if strict => exit_codes::ERROR,
            Outcome::Rejected(_) => exit_codes::SUCCESS,
        }
    }
}

/// Run one create-user attempt.
///
/// `config` is the result of loading the configuration; a
/// [`Error::MissingConfig`] trips the first gate. `connect` builds the
/// backend client and is only called once both gates have passed.
///
/// Transport failures and client construction errors are returned as `Err`
/// and are never retried.
pub fn run<B, C, O, E>(
    config: Result<Config>,
    email: Option<&str>,
    connect: C,
    console: &mut Console<O, E>,
) -> Result<Outcome>
where
    B: IdentityBackend,
    C: FnOnce(&Config) -> Result<B>,
    O: Write,
    E: Write,
{
    let config = match config {
        Ok(config) => config,
        Err(Error::MissingConfig { missing }) => {
            debug!("Missing configuration: {}", missing.join(", "));
            writeln!(
                console.err,
                "Error: {SUPABASE_URL} and {SUPABASE_SECRET_KEY} are required."
            )?;
            writeln!(
                console.out,
                "Ensure you have a .env file with these values or pass them as environment variables."
            )?;
            return Ok(Outcome::ConfigMissing);
        }
        Err(e) => return Err(e),
    };

    let email = match email.filter(|email| !email.is_empty()) {
        Some(email) => email,
        None => {
            writeln!(console.err, "Usage: {PROGRAM_NAME} <email>")?;
            return Ok(Outcome::UsageError);
        }
    };

    writeln!(console.out, "Creating user with email: {email}...")?;
    debug!("Connecting to {}", config.url());

    let backend = connect(&config)?;
    let request = NewUser::auto_confirmed(email);

    match backend.create_user(&request)? {
        Ok(user) => {
            writeln!(console.out, "User created successfully!")?;
            writeln!(console.out, "User ID: {}", user.id)?;
            writeln!(console.out, "Email: {}", user.email)?;
            Ok(Outcome::Created(user))
        }
        Err(rejection) => {
            debug!("Backend rejected request with status {}", rejection.status);
            writeln!(console.err, "Error creating user: {}", rejection.message)?;
            Ok(Outcome::Rejected(rejection))
        }
    }
}
