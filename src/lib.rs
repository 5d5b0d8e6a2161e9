//! # auth-admin
//!
//! Provision a user in a hosted identity backend from the command line. The
//! `auth-admin` binary reads the backend's URL and secret key from the
//! environment, takes one email address as its argument, and issues a single
//! administrative "create user" call with the email marked as already
//! confirmed, so the new account can sign in immediately.
//!
//! ## Quick Example
//!
//! ```
//! use auth_admin::admin::{admin_users_endpoint, NewUser};
//!
//! let endpoint = admin_users_endpoint("https://example.supabase.co").unwrap();
//! assert_eq!(endpoint.path(), "/auth/v1/admin/users");
//!
//! let request = NewUser::auto_confirmed("a@example.com");
//! assert!(request.email_confirm);
//! ```
//!
//! ## Modules
//!
//! - **Configuration (`config`)**: the two required environment variables
//!   and optional `.env` loading.
//! - **Backend client (`admin`)**: the [`admin::IdentityBackend`] seam and its
//!   HTTP implementation.
//! - **Flow (`run`)**: the configuration gate, argument gate, remote call and
//!   report, written against injectable I/O.
//! - **Errors (`error`, `exit_codes`)**: the library error type and the
//!   process exit statuses.
//!
//! Exactly one creation attempt is made per invocation. Nothing is retried
//! and duplicate emails are left to the backend to reject.

pub mod admin;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod run;
