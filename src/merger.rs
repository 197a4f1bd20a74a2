//! Rule selection and file merging
//!
//! A run selects the rules whose patterns match the project's identifiers,
//! then loads every file those rules reference, in rule order and then file
//! order. A file reached twice (by two rules, or listed twice) is loaded
//! once, at its first position.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::Result;
use crate::model::Rule;
use crate::pattern;
use crate::store::{self, RecipeFile};

/// Documents accumulated from the selected rules' files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeResult {
    pub documents: RecipeFile,
    /// Files that were read and contributed documents.
    pub files_merged: usize,
    /// Files skipped as duplicates or because they do not exist.
    pub files_skipped: usize,
}

/// Rules whose group and artifact patterns both match, in table order.
pub fn select_rules<'a>(
    rules: &'a [Rule],
    group_id: Option<&str>,
    artifact_id: Option<&str>,
) -> Vec<&'a Rule> {
    let selected: Vec<&Rule> = rules
        .iter()
        .filter(|rule| {
            pattern::matches(rule.group_id.as_deref(), group_id)
                && pattern::matches(Some(rule.artifact_id.as_str()), artifact_id)
        })
        .collect();
    info!(
        "{} of {} rule(s) match {}:{}",
        selected.len(),
        rules.len(),
        group_id.unwrap_or("<any>"),
        artifact_id.unwrap_or("<none>")
    );
    selected
}

/// Load and concatenate the files referenced by `rules`.
///
/// Paths are resolved against `base_dir`. Missing files are reported to
/// `diagnostics` and skipped; a file that exists but cannot be read is an
/// error.
pub fn merge_files(
    base_dir: &Path,
    rules: &[&Rule],
    diagnostics: &mut Diagnostics,
) -> Result<MergeResult> {
    let mut result = MergeResult::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for file in rules.iter().flat_map(|rule| rule.merge_files.iter()) {
        let path = std::path::absolute(base_dir.join(file))?;

        if !path.is_file() {
            diagnostics.warn(Warning::MissingMergeFile { path });
            result.files_skipped += 1;
            continue;
        }

        // Canonical form so that `a/../base.yml` and `base.yml` dedup.
        let key = path.canonicalize().unwrap_or_else(|_| path.clone());
        if !seen.insert(key) {
            diagnostics.note(format!("Skipping already merged file: {}", path.display()));
            result.files_skipped += 1;
            continue;
        }

        debug!("Merging {}", path.display());
        let loaded = store::load_recipe_file(&path, diagnostics)?;
        result.documents.extend(loaded);
        result.files_merged += 1;
    }

    info!(
        "Merged {} file(s): {} recipe(s), {} merge document(s)",
        result.files_merged,
        result.documents.recipes.len(),
        result.documents.merge_documents.len()
    );
    Ok(result)
}
