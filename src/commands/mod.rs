//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `recipe-prepare` command-line tool, one file per subcommand.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and the shared
//!   [`Context`](crate::cli::Context), calls into the `recipe_prepare`
//!   library, and prints the outcome.

pub mod completions;
pub mod prepare;
pub mod resolve;
pub mod validate;

use anyhow::Result;
use serde::Serialize;

use recipe_prepare::diagnostics::Diagnostics;

#[derive(Serialize)]
struct Report<'a, T: Serialize> {
    summary: &'a T,
    #[serde(flatten)]
    diagnostics: &'a Diagnostics,
}

/// Print `summary` and the run's diagnostics as one JSON object on stdout.
pub(crate) fn print_json<T: Serialize>(summary: &T, diagnostics: &Diagnostics) -> Result<()> {
    let report = Report {
        summary,
        diagnostics,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Print a one-line warning count after the human-readable summary.
pub(crate) fn print_warning_count(diagnostics: &Diagnostics) {
    let count = diagnostics.warnings().len();
    if count > 0 {
        println!("{} warning(s), see log output above", count);
    }
}
