//! # Prepare Command Implementation
//!
//! This module implements the `prepare` subcommand: select the merge rules
//! matching a project, merge the recipe files they reference, apply ordering
//! edits, and write the generated recipe file.
//!
//! A project that no rule matches is not an error; nothing is written.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use recipe_prepare::defaults;
use recipe_prepare::diagnostics::Diagnostics;
use recipe_prepare::pipeline::{self, PrepareRequest};

use crate::cli::Context;

/// Merge the recipe files matching a project into one recipe file
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Merge rule table.
    #[arg(
        long,
        value_name = "FILE",
        default_value = defaults::RULES_FILE,
        env = "RECIPE_PREPARE_RULES"
    )]
    pub rules: PathBuf,

    /// Directory that the rule table's `mergeFiles` are relative to.
    ///
    /// Defaults to the project directory.
    #[arg(long, value_name = "DIR", env = "RECIPE_PREPARE_RECIPE_DIR")]
    pub recipe_dir: Option<PathBuf>,

    /// Where to write the generated recipe file.
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = defaults::OUTPUT_FILE,
        env = "RECIPE_PREPARE_OUTPUT"
    )]
    pub output: PathBuf,

    /// The project's groupId. Without it only rules with no groupId match.
    #[arg(short, long, value_name = "ID")]
    pub group_id: Option<String>,

    /// The project's artifactId.
    #[arg(short, long, value_name = "ID")]
    pub artifact_id: String,
}

/// Execute the `prepare` command.
pub fn execute(args: PrepareArgs, context: &Context) -> Result<()> {
    let request = PrepareRequest {
        rules_path: context.resolve(&args.rules),
        recipe_dir: args
            .recipe_dir
            .as_deref()
            .map(|dir| context.resolve(dir))
            .unwrap_or_else(|| context.project_dir.clone()),
        group_id: args.group_id,
        artifact_id: args.artifact_id,
        output: context.resolve(&args.output),
    };

    let mut diagnostics = Diagnostics::new();
    let summary = pipeline::run_prepare(&request, &mut diagnostics)
        .with_context(|| format!("Failed to prepare recipes for {}", request.artifact_id))?;

    if context.json {
        return super::print_json(&summary, &diagnostics);
    }

    match &summary.output {
        Some(output) => {
            println!(
                "Wrote {} recipe(s) to {}",
                summary.recipes_written,
                output.display()
            );
            println!(
                "   Rules matched: {}, files merged: {}, files skipped: {}",
                summary.rules_matched, summary.files_merged, summary.files_skipped
            );
            println!(
                "   Edits applied: {}, entries inserted: {}",
                summary.edits_applied, summary.entries_inserted
            );
        }
        None => println!(
            "No merge rule matches {}, nothing written",
            request.artifact_id
        ),
    }
    super::print_warning_count(&diagnostics);
    Ok(())
}
