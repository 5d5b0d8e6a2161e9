//! CLI argument parsing and dispatch

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::debug;

use auth_admin::admin::HttpBackend;
use auth_admin::config::{self, Config};
use auth_admin::run::{self, Console};

/// Create an auto-confirmed user through the identity backend's admin API
///
/// Reads SUPABASE_URL and SUPABASE_SECRET_KEY from the environment (or a
/// .env file) and creates one user for EMAIL.
#[derive(Parser, Debug)]
#[command(name = "auth-admin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Email address of the user to create
    #[arg(value_name = "EMAIL")]
    email: Option<String>,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,

    /// Exit with a failure status when the backend rejects the request
    #[arg(long)]
    strict: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

impl Cli {
    /// Execute the CLI and return the process exit status.
    pub fn execute(self) -> Result<i32> {
        // `.env` may set RUST_LOG, so it is read before the logger starts.
        let env_file = config::load_env_file(self.env_file.as_deref());
        init_logging(&self.log_level);
        env_file?;

        let mut console = Console::new(io::stdout().lock(), io::stderr().lock());

        let outcome = run::run(
            Config::from_env(),
            self.email.as_deref(),
            HttpBackend::new,
            &mut console,
        )?;
        console.out.flush()?;
        debug!("Finished with {:?}", outcome);

        Ok(outcome.exit_code(self.strict))
    }
}

/// Route `log` records to stderr. `RUST_LOG` wins over `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}
