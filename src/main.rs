//! # Addons Filter CLI
//!
//! Binary entry point for the `addons-filter` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the filtering pipeline with the parsed options.
//! - Translating any pipeline error into a non-zero exit status.
//!
//! The core logic lives in the library crate; the binary is a thin wrapper
//! around it.

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
