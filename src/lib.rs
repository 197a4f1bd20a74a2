//! # Recipe Prepare Library
//!
//! This library assembles the migration recipe file for one project out of a
//! shared library of recipe fragments. It backs the `recipe-prepare`
//! command-line tool, and a build-tool integration can drive it directly as
//! well, since the library only needs a handful of paths and the project's
//! identifiers.
//!
//! ## Quick Example
//!
//! ```
//! use recipe_prepare::diagnostics::Diagnostics;
//! use recipe_prepare::editor::apply_edit;
//! use recipe_prepare::store;
//! use std::path::Path;
//!
//! let text = r#"
//! ---
//! name: com.example.Main
//! recipeList:
//!   - com.example.Build
//! ---
//! type: org.yourcompany.openrewrite/v1/merge
//! rules:
//!   - updateRecipeList:
//!       name: com.example.Main
//!       updateOrder:
//!         - before:
//!             - com.example.Build: [com.example.Lint]
//! "#;
//!
//! let mut diagnostics = Diagnostics::new();
//! let mut file = store::parse_recipe_documents(text, Path::new("recipes.yml"), &mut diagnostics);
//! for edit in &file.merge_documents[0].edits {
//!     apply_edit(&mut file.recipes, edit, &mut diagnostics);
//! }
//! assert_eq!(file.recipes[0].entry_names(), ["com.example.Lint", "com.example.Build"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Rules (`model::Rule`)**: entries of the merge rule table. Each maps glob
//!   patterns over the project's `groupId`/`artifactId` to recipe files.
//! - **Documents (`model`)**: recipe documents, which end up in the output, and
//!   merge documents, which only carry ordering edits.
//! - **Store (`store`)**: YAML in and out, tolerant of a bad document among
//!   good ones.
//! - **Merger and editor (`merger`, `editor`)**: rule selection, file merging
//!   and `first`/`last`/`before`/`after` list splicing.
//! - **Substitution (`substitute`)**: `${name}` and `$name` placeholders filled
//!   from a properties file.
//!
//! ## Execution Flow
//!
//! [`pipeline::run_prepare`] loads the rule table, selects matching rules,
//! merges their files, applies the edits and writes the result.
//! [`pipeline::run_resolve`] substitutes placeholders in the written file
//! afterwards. Recoverable problems are collected in a
//! [`diagnostics::Diagnostics`]; fatal ones come back as [`error::Error`].

pub mod defaults;
pub mod diagnostics;
pub mod editor;
pub mod error;
pub mod merger;
pub mod model;
pub mod pattern;
pub mod pipeline;
pub mod store;
pub mod substitute;

#[cfg(test)]
mod editor_proptest;
#[cfg(test)]
mod pattern_proptest;
