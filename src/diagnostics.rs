//! Recoverable conditions reported during a run
//!
//! None of the conditions here stop a run or invalidate its output. Each one
//! is logged through the `log` facade when it is recorded and kept in a
//! [`Diagnostics`] value, so the host can print a summary and tests can assert
//! on what was skipped.

use std::fmt;
use std::path::PathBuf;

use log::{info, warn};
use serde::Serialize;

/// A recoverable condition encountered while merging, editing or resolving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Warning {
    /// A rule referenced a merge file that does not exist.
    MissingMergeFile { path: PathBuf },
    /// A document inside a recipe file could not be decoded and was skipped.
    MalformedDocument {
        file: PathBuf,
        /// 1-based position of the document within the file
        index: usize,
        message: String,
    },
    /// An edit named a recipe document that is not part of this merge.
    TargetNotFound { target: String },
    /// A `before`/`after` anchor is not in the target's recipe list.
    AnchorNotFound { target: String, anchor: String },
    /// A value to insert is already present in the target's recipe list.
    DuplicateEntry { target: String, entry: String },
    /// A placeholder has no entry in the variable map.
    UnresolvedVariable { name: String },
    /// `resolve` had nothing to work on (missing variable map or target).
    NothingToResolve { path: PathBuf, reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingMergeFile { path } => {
                write!(f, "Merge file does not exist, skipping: {}", path.display())
            }
            Warning::MalformedDocument {
                file,
                index,
                message,
            } => write!(
                f,
                "Skipping document {} in {}: {}",
                index,
                file.display(),
                message
            ),
            Warning::TargetNotFound { target } => {
                write!(f, "Target recipe not found, skipping edit: {}", target)
            }
            Warning::AnchorNotFound { target, anchor } => write!(
                f,
                "Anchor '{}' not found in recipeList of {}, skipping",
                anchor, target
            ),
            Warning::DuplicateEntry { target, entry } => write!(
                f,
                "Recipe '{}' already in recipeList of {}, skipping",
                entry, target
            ),
            Warning::UnresolvedVariable { name } => {
                write!(f, "No value for variable '{}', leaving it as is", name)
            }
            Warning::NothingToResolve { path, reason } => {
                write!(f, "{}: {}", reason, path.display())
            }
        }
    }
}

/// Collects warnings and informational notes for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
    notes: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it at `warn` level.
    pub fn warn(&mut self, warning: Warning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Record an informational note and log it at `info` level.
    pub fn note(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.notes.push(message);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Number of warnings matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Warning) -> bool) -> usize {
        self.warnings.iter().filter(|w| predicate(w)).count()
    }

    /// Append everything recorded in `other`, preserving its order.
    ///
    /// Entries are not logged again.
    pub fn absorb(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
        self.notes.extend(other.notes);
    }
}
