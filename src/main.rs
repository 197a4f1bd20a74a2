//! # Recipe Prepare CLI
//!
//! This is the binary entry point for the `recipe-prepare` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Handling top-level application errors and translating them into user-friendly
//!   output.
//!
//! The merge, edit and substitution logic lives in the `recipe_prepare`
//! library; the binary only wires paths and flags into it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
