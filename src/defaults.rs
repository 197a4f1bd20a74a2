//! Default values for recipe-prepare configuration.
//!
//! Relative defaults are resolved against the project directory by the CLI.

use std::path::PathBuf;

/// Rule table, relative to the project directory.
pub const RULES_FILE: &str = "merge-rules.yml";

/// Generated recipe file, relative to the project directory.
pub const OUTPUT_FILE: &str = "openrewrite/rewrite.yml";

/// Variable map used by `resolve`, relative to the project directory.
pub const VAR_MAP_FILE: &str = "migration-ci/rules/var-map.properties";

/// Returns the default project directory.
///
/// This is the current working directory, falling back to `.` if it cannot be
/// determined. It can be overridden by the `--project-dir` flag or the
/// `RECIPE_PREPARE_PROJECT_DIR` environment variable.
pub fn default_project_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
