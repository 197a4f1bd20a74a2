//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks a merge
//! rule table without merging anything.
//!
//! ## Functionality
//!
//! - **Rule validation**: every rule is decoded and each problem is reported
//!   with its 1-based index, instead of stopping at the first one as `prepare`
//!   does.
//! - **File checks**: with `--recipe-dir`, referenced merge files that do not
//!   exist are listed. These are warnings, since `prepare` skips them too.
//!
//! This command is a safe, read-only operation that does not modify any files.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use recipe_prepare::defaults;
use recipe_prepare::error::Error;
use recipe_prepare::model::Rule;
use recipe_prepare::store;

use crate::cli::Context;

/// Check a merge rule table without merging anything
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Merge rule table to validate.
    #[arg(
        long,
        value_name = "FILE",
        default_value = defaults::RULES_FILE,
        env = "RECIPE_PREPARE_RULES"
    )]
    pub rules: PathBuf,

    /// Also check that merge files exist below this directory.
    #[arg(long, value_name = "DIR", env = "RECIPE_PREPARE_RECIPE_DIR")]
    pub recipe_dir: Option<PathBuf>,
}

/// Outcome of checking one rule.
#[derive(Debug, Serialize)]
struct RuleCheck {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing_files: Vec<PathBuf>,
}

impl RuleCheck {
    fn new(index: usize, outcome: std::result::Result<Rule, Error>, recipe_dir: Option<&Path>) -> Self {
        match outcome {
            Ok(rule) => {
                let missing_files = recipe_dir
                    .map(|dir| {
                        rule.merge_files
                            .iter()
                            .map(|file| dir.join(file))
                            .filter(|path| !path.is_file())
                            .collect()
                    })
                    .unwrap_or_default();
                Self {
                    index,
                    artifact_id: Some(rule.artifact_id),
                    error: None,
                    missing_files,
                }
            }
            Err(err) => Self {
                index,
                artifact_id: None,
                error: Some(err.to_string()),
                missing_files: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    rules: Vec<RuleCheck>,
    valid: bool,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, context: &Context) -> Result<()> {
    let rules_path = context.resolve(&args.rules);
    if !rules_path.is_file() {
        bail!(Error::RuleTableNotFound { path: rules_path });
    }
    let recipe_dir = args.recipe_dir.as_deref().map(|dir| context.resolve(dir));

    let text = std::fs::read_to_string(&rules_path)?;
    let checks: Vec<RuleCheck> = store::parse_rule_entries(&text)?
        .into_iter()
        .enumerate()
        .map(|(i, outcome)| RuleCheck::new(i + 1, outcome, recipe_dir.as_deref()))
        .collect();

    let invalid = checks.iter().filter(|check| check.error.is_some()).count();
    let report = ValidationReport {
        valid: invalid == 0 && !checks.is_empty(),
        rules: checks,
    };

    if context.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validating rule table: {}", rules_path.display());
        for check in &report.rules {
            match (&check.error, &check.artifact_id) {
                (Some(error), _) => println!("[ERR]  {}", error),
                (None, Some(artifact)) => println!("[OK]   Rule {}: artifactId {}", check.index, artifact),
                (None, None) => {}
            }
            for missing in &check.missing_files {
                println!("[WARN] Rule {}: merge file not found: {}", check.index, missing.display());
            }
        }
    }

    if report.rules.is_empty() {
        bail!(Error::EmptyRuleTable { path: rules_path });
    }
    if invalid > 0 {
        bail!("{} of {} rule(s) are invalid", invalid, report.rules.len());
    }
    if !context.json {
        println!("Rule table is valid ({} rule(s))", report.rules.len());
    }
    Ok(())
}
