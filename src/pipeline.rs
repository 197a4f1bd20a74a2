//! Orchestration of the `prepare` and `resolve` runs
//!
//! `prepare` turns a rule table and a recipe directory into one generated
//! recipe file for a project:
//!
//! 1. Load the rule table (fatal on any invalid rule)
//! 2. Select the rules matching the project's identifiers
//! 3. Merge the files they reference
//! 4. Apply merge documents' edits, then the rules' inline edits
//! 5. Write the surviving recipe documents
//!
//! `resolve` substitutes placeholders in an already generated file, or in
//! every YAML file below a directory.

use std::path::{Path, PathBuf};

use log::info;
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::diagnostics::{Diagnostics, Warning};
use crate::editor::{apply_edit, EditOutcome};
use crate::error::{Error, Result};
use crate::merger::{merge_files, select_rules};
use crate::model::{OrderEdit, Rule};
use crate::store::{self, RecipeFile};
use crate::substitute::{substitute_file, FileSubstitution, Placeholders, VariableMap};

/// Inputs of a `prepare` run. Paths are used as given.
#[derive(Debug, Clone)]
pub struct PrepareRequest {
    pub rules_path: PathBuf,
    /// Directory that rule `mergeFiles` are relative to.
    pub recipe_dir: PathBuf,
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub output: PathBuf,
}

/// Counts reported after a `prepare` run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrepareSummary {
    pub rules_matched: usize,
    pub files_merged: usize,
    pub files_skipped: usize,
    pub recipes_written: usize,
    pub merge_documents: usize,
    /// Edits whose target document was found.
    pub edits_applied: usize,
    pub entries_inserted: usize,
    /// `None` when no rule matched and nothing was written.
    pub output: Option<PathBuf>,
}

/// Run `prepare` end to end.
pub fn run_prepare(request: &PrepareRequest, diagnostics: &mut Diagnostics) -> Result<PrepareSummary> {
    let rules = store::load_rule_table(&request.rules_path)?;
    prepare_with_rules(&rules, request, diagnostics)
}

/// Run `prepare` against an already loaded rule table.
///
/// `request.rules_path` is not read.
pub fn prepare_with_rules(
    rules: &[Rule],
    request: &PrepareRequest,
    diagnostics: &mut Diagnostics,
) -> Result<PrepareSummary> {
    let selected = select_rules(rules, request.group_id.as_deref(), Some(request.artifact_id.as_str()));
    if selected.is_empty() {
        info!(
            "No merge rule matches {}, nothing to generate",
            request.artifact_id
        );
        return Ok(PrepareSummary::default());
    }

    let merged = merge_files(&request.recipe_dir, &selected, diagnostics)?;
    let RecipeFile {
        mut recipes,
        merge_documents,
    } = merged.documents;

    let mut summary = PrepareSummary {
        rules_matched: selected.len(),
        files_merged: merged.files_merged,
        files_skipped: merged.files_skipped,
        merge_documents: merge_documents.len(),
        ..PrepareSummary::default()
    };

    // Merge documents first, in document then edit order; rules' own edits last.
    let edits: Vec<&OrderEdit> = merge_documents
        .iter()
        .flat_map(|doc| doc.edits.iter())
        .chain(selected.iter().filter_map(|rule| rule.edit.as_ref()))
        .collect();
    for edit in edits {
        let outcome = apply_edit(&mut recipes, edit, diagnostics);
        if outcome != EditOutcome::TargetMissing {
            summary.edits_applied += 1;
        }
        summary.entries_inserted += outcome.inserted();
    }

    store::write_recipe_documents(&recipes, &request.output)?;
    summary.recipes_written = recipes.len();
    summary.output = Some(request.output.clone());
    Ok(summary)
}

/// Inputs of a `resolve` run.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// A file, or a directory searched recursively for `.yml`/`.yaml` files.
    pub target: PathBuf,
    pub var_map: PathBuf,
}

/// Counts reported after a `resolve` run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolveSummary {
    pub files_processed: usize,
    pub files_changed: usize,
    pub variables_loaded: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

/// Run `resolve`.
///
/// A missing variable map or target is reported and ends the run without
/// changes.
pub fn run_resolve(request: &ResolveRequest, diagnostics: &mut Diagnostics) -> Result<ResolveSummary> {
    if !request.var_map.is_file() {
        diagnostics.warn(Warning::NothingToResolve {
            path: request.var_map.clone(),
            reason: "Variable map not found".to_string(),
        });
        return Ok(ResolveSummary::default());
    }
    if !request.target.exists() {
        diagnostics.warn(Warning::NothingToResolve {
            path: request.target.clone(),
            reason: "Target not found".to_string(),
        });
        return Ok(ResolveSummary::default());
    }

    let variables = VariableMap::from_file(&request.var_map)?;
    let files = if request.target.is_dir() {
        collect_yaml_files(&request.target)?
    } else {
        vec![request.target.clone()]
    };

    let placeholders = Placeholders::new()?;
    // Each file reports into its own sink; results are folded in path order.
    let results: Vec<(Result<FileSubstitution>, Diagnostics)> = files
        .par_iter()
        .map(|path| {
            let mut file_diagnostics = Diagnostics::new();
            let result = substitute_file(path, &placeholders, &variables, &mut file_diagnostics);
            (result, file_diagnostics)
        })
        .collect();

    let mut summary = ResolveSummary {
        variables_loaded: variables.len(),
        ..ResolveSummary::default()
    };
    for (result, file_diagnostics) in results {
        diagnostics.absorb(file_diagnostics);
        let file = result?;
        summary.files_processed += 1;
        summary.files_changed += usize::from(file.changed);
        summary.resolved += file.resolved;
        summary.unresolved += file.unresolved;
    }

    info!(
        "Resolved {} placeholder(s) in {} of {} file(s)",
        summary.resolved, summary.files_changed, summary.files_processed
    );
    Ok(summary)
}

/// Every `.yml`/`.yaml` file below `dir`, sorted by path.
fn collect_yaml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|err| Error::Filesystem {
            message: format!("Failed to walk {}: {}", dir.display(), err),
        })?;
        let is_yaml = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yml" || ext == "yaml");
        if entry.file_type().is_file() && is_yaml {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
