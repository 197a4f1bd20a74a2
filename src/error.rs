//! # Error Handling
//!
//! This module defines the centralized error type for `recipe-prepare`. It
//! uses `thiserror` to describe every failure that aborts a run. Conditions
//! that only skip part of the work (a missing merge file, an unknown anchor)
//! are not errors; they are recorded in
//! [`Diagnostics`](crate::diagnostics::Diagnostics) instead.
//!
//! ## Tiers
//!
//! - **Fatal**: returned as `Err(Error)` from the pipeline. The rule table is
//!   missing, unparsable, empty, or one of its rules lacks a required field.
//! - **Document-level**: [`Error::Document`] is produced while decoding a
//!   single YAML document. The store catches it, logs it and moves on to the
//!   next document in the file.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for recipe-prepare operations
#[derive(Error, Debug)]
pub enum Error {
    /// The rule table or variable map could not be parsed.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The rule table file does not exist.
    #[error("Merge rule file not found: {}", path.display())]
    RuleTableNotFound { path: PathBuf },

    /// The rule table parsed, but it contains no rules.
    #[error("Merge rule file defines no rules: {}", path.display())]
    EmptyRuleTable { path: PathBuf },

    /// A rule is missing a required field or has an empty one.
    ///
    /// `index` is 1-based, matching how users count entries in the file.
    #[error("Rule {index}: {message}")]
    InvalidRule { index: usize, message: String },

    /// A single recipe or merge document could not be decoded.
    #[error("Invalid document: {message}")]
    Document { message: String },

    /// Writing or creating something on disk failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn document(message: impl Into<String>) -> Self {
        Error::Document {
            message: message.into(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
