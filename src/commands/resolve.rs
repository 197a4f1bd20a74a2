//! # Resolve Command Implementation
//!
//! This module implements the `resolve` subcommand, which fills `${name}` and
//! `$name` placeholders in generated recipe files from a properties-style
//! variable map. Files are rewritten only when their content changes.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use recipe_prepare::defaults;
use recipe_prepare::diagnostics::Diagnostics;
use recipe_prepare::pipeline::{self, ResolveRequest};

use crate::cli::Context;

/// Substitute placeholders in a generated recipe file
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// File to resolve, or a directory whose .yml/.yaml files are resolved.
    #[arg(
        short,
        long,
        value_name = "PATH",
        default_value = defaults::OUTPUT_FILE,
        env = "RECIPE_PREPARE_OUTPUT"
    )]
    pub target: PathBuf,

    /// Variable map in key=value form.
    #[arg(
        long,
        value_name = "FILE",
        default_value = defaults::VAR_MAP_FILE,
        env = "RECIPE_PREPARE_VAR_MAP"
    )]
    pub var_map: PathBuf,
}

/// Execute the `resolve` command.
pub fn execute(args: ResolveArgs, context: &Context) -> Result<()> {
    let request = ResolveRequest {
        target: context.resolve(&args.target),
        var_map: context.resolve(&args.var_map),
    };

    let mut diagnostics = Diagnostics::new();
    let summary = pipeline::run_resolve(&request, &mut diagnostics)?;

    if context.json {
        return super::print_json(&summary, &diagnostics);
    }

    println!(
        "Resolved {} placeholder(s), {} unresolved",
        summary.resolved, summary.unresolved
    );
    println!(
        "   Files processed: {}, files changed: {}, variables loaded: {}",
        summary.files_processed, summary.files_changed, summary.variables_loaded
    );
    super::print_warning_count(&diagnostics);
    Ok(())
}
