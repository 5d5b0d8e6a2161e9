//! # auth-admin CLI
//!
//! Binary entry point for the `auth-admin` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the create-user flow from the library.
//! - Translating the outcome into a process exit status.
//!
//! The logic lives in the `auth_admin` library crate; the binary is a thin
//! wrapper around it.

mod cli;

use std::process;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let code = cli.execute()?;
    if code != auth_admin::exit_codes::SUCCESS {
        process::exit(code);
    }
    Ok(())
}
