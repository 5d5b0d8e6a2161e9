//! Shared test utilities for E2E tests.
//!
//! This module provides a temp-directory fixture that builds `auth-admin`
//! commands with a clean environment, plus [`StubBackend`], a loopback HTTP
//! server that stands in for the identity backend.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let backend = StubBackend::start(vec![StubResponse::created("u-1", "a@example.com")]);
//!     let fixture = TestFixture::new();
//!     fixture.command_for(&backend).arg("a@example.com").assert().success();
//!     assert_eq!(backend.connections(), 1);
//! }
//! ```

use assert_fs::prelude::*;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::secrets;
    #[allow(unused_imports)]
    pub use super::{StubBackend, StubResponse, TestFixture};
}

/// Credential values used across tests.
#[allow(dead_code)]
pub mod secrets {
    /// Secret key handed to the binary; must never show up in output.
    pub const SECRET_KEY: &str = "test-service-role-key";
}

/// A canned answer from the stub backend.
#[derive(Debug, Clone)]
pub enum StubResponse {
    /// Reply with a status and a JSON body.
    Reply { status: u16, body: String },
    /// Read the request, then close the connection without answering.
    Hangup,
}

#[allow(dead_code)]
impl StubResponse {
    /// A successful creation returning the user object at the top level.
    pub fn created(id: &str, email: &str) -> Self {
        Self::Reply {
            status: 200,
            body: serde_json::json!({
                "id": id,
                "aud": "authenticated",
                "role": "authenticated",
                "email": email,
                "email_confirmed_at": "2024-01-01T00:00:00Z",
            })
            .to_string(),
        }
    }

    /// A rejection with a `{message}` body.
    pub fn rejected(status: u16, message: &str) -> Self {
        Self::Reply {
            status,
            body: serde_json::json!({ "message": message }).to_string(),
        }
    }
}

/// A request as seen by the stub backend.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lowercased.
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[allow(dead_code)]
impl RecordedRequest {
    /// The request body parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body should be JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// Loopback HTTP server that replays [`StubResponse`]s in order.
///
/// Every accepted connection is counted, so tests can assert how many
/// attempts the binary made. Once the script runs out, connections are
/// hung up on.
pub struct StubBackend {
    url: String,
    connections: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl StubBackend {
    /// Bind to an ephemeral port and start serving `script`.
    pub fn start(script: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub backend");
        let addr = listener.local_addr().expect("stub backend has no address");
        let connections = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let thread_connections = Arc::clone(&connections);
        let thread_requests = Arc::clone(&requests);
        thread::spawn(move || {
            let mut script = script.into_iter();
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                thread_connections.fetch_add(1, Ordering::SeqCst);

                let Some(request) = read_request(&mut stream) else {
                    continue;
                };
                thread_requests.lock().unwrap().push(request);

                match script.next() {
                    Some(StubResponse::Reply { status, body }) => {
                        let response = format!(
                            "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                            body.len()
                        );
                        let _ = stream.write_all(response.as_bytes());
                        let _ = stream.flush();
                    }
                    Some(StubResponse::Hangup) | None => {}
                }
            }
        });

        Self {
            url: format!("http://{addr}"),
            connections,
            requests,
        }
    }

    /// Base URL to put in `SUPABASE_URL`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of TCP connections accepted so far.
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }

    let length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).ok()?;

    Some(RecordedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// A temporary working directory for one `auth-admin` invocation.
///
/// Running inside a fresh directory keeps a developer's own `.env` out of
/// the test.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A command with no backend configuration at all.
    ///
    /// Credentials, proxies and log filters are scrubbed from the
    /// inherited environment so output is deterministic.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("auth-admin");
        cmd.current_dir(self.path())
            .env_remove("SUPABASE_URL")
            .env_remove("SUPABASE_SECRET_KEY")
            .env_remove("RUST_LOG")
            .env_remove("HTTP_PROXY")
            .env_remove("http_proxy")
            .env_remove("HTTPS_PROXY")
            .env_remove("https_proxy")
            .env_remove("ALL_PROXY")
            .env_remove("all_proxy")
            .env("NO_PROXY", "*");
        cmd
    }

    /// A command fully configured against `backend`.
    pub fn command_for(&self, backend: &StubBackend) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.env("SUPABASE_URL", backend.url())
            .env("SUPABASE_SECRET_KEY", secrets::SECRET_KEY);
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
