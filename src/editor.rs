//! # List Editor
//!
//! Applies an [`OrderEdit`] to the recipe list of one document, in place.
//!
//! The four kinds of insertion always run in the same order: `first`, `last`,
//! `before`, `after`. Every candidate value is checked against the list as it
//! stands at that moment, so a later insertion sees earlier ones, and so does
//! a later edit. A value already present by name is skipped and reported.
//!
//! ```
//! use recipe_prepare::diagnostics::Diagnostics;
//! use recipe_prepare::editor::apply_edit;
//! use recipe_prepare::model::{AnchoredInsert, OrderEdit, RecipeDocument};
//!
//! let mut documents = vec![RecipeDocument::new("Main").with_entries(["R1", "R2"])];
//! let mut edit = OrderEdit::new("Main");
//! edit.first.push("R0".to_string());
//! edit.before.push(AnchoredInsert::new("R2", ["R1.5"]));
//!
//! apply_edit(&mut documents, &edit, &mut Diagnostics::new());
//! assert_eq!(documents[0].entry_names(), ["R0", "R1", "R1.5", "R2"]);
//! ```

use log::{debug, info};

use crate::diagnostics::{Diagnostics, Warning};
use crate::model::{AnchoredInsert, OrderEdit, RecipeDocument, RecipeEntry};

/// What one call to [`apply_edit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// No document carries the edit's target name; nothing changed.
    TargetMissing,
    Applied {
        inserted: usize,
        /// Values not inserted: duplicates and values of unknown anchors.
        skipped: usize,
    },
}

impl EditOutcome {
    pub fn inserted(&self) -> usize {
        match self {
            EditOutcome::TargetMissing => 0,
            EditOutcome::Applied { inserted, .. } => *inserted,
        }
    }
}

/// Apply `edit` to the first document named `edit.target_name`.
///
/// The target's recipe list is created if it was absent.
pub fn apply_edit(
    documents: &mut [RecipeDocument],
    edit: &OrderEdit,
    diagnostics: &mut Diagnostics,
) -> EditOutcome {
    let Some(target) = documents
        .iter_mut()
        .find(|doc| doc.name == edit.target_name)
    else {
        diagnostics.warn(Warning::TargetNotFound {
            target: edit.target_name.clone(),
        });
        return EditOutcome::TargetMissing;
    };

    let mut splice = Splice {
        target: &edit.target_name,
        list: target.recipe_list_mut(),
        diagnostics,
        inserted: 0,
        skipped: 0,
    };
    splice.prepend(&edit.first);
    splice.append(&edit.last);
    for insert in &edit.before {
        splice.before(insert);
    }
    for insert in &edit.after {
        splice.after(insert);
    }

    info!(
        "Updated recipeList of {}: {} inserted, {} skipped",
        edit.target_name, splice.inserted, splice.skipped
    );
    EditOutcome::Applied {
        inserted: splice.inserted,
        skipped: splice.skipped,
    }
}

/// Working state for one edit against one recipe list.
struct Splice<'a> {
    target: &'a str,
    list: &'a mut Vec<RecipeEntry>,
    diagnostics: &'a mut Diagnostics,
    inserted: usize,
    skipped: usize,
}

impl Splice<'_> {
    fn position(&self, name: &str) -> Option<usize> {
        self.list.iter().position(|entry| entry.name == name)
    }

    fn skip_duplicate(&mut self, value: &str) {
        self.diagnostics.warn(Warning::DuplicateEntry {
            target: self.target.to_string(),
            entry: value.to_string(),
        });
        self.skipped += 1;
    }

    /// `true` if `value` may be inserted; reports it otherwise.
    fn accept(&mut self, value: &str) -> bool {
        if self.position(value).is_some() {
            self.skip_duplicate(value);
            false
        } else {
            true
        }
    }

    fn prepend(&mut self, values: &[String]) {
        let mut accepted: Vec<&String> = Vec::with_capacity(values.len());
        for value in values {
            if accepted.contains(&value) {
                self.skip_duplicate(value);
            } else if self.accept(value) {
                accepted.push(value);
            }
        }
        self.inserted += accepted.len();
        self.list
            .splice(0..0, accepted.into_iter().map(|v| RecipeEntry::bare(v.as_str())));
    }

    fn append(&mut self, values: &[String]) {
        for value in values {
            if self.accept(value) {
                self.list.push(RecipeEntry::bare(value.as_str()));
                self.inserted += 1;
            }
        }
    }

    /// Insert at the anchor's index from the last value to the first, so the
    /// values end up in their given order ahead of the anchor.
    fn before(&mut self, insert: &AnchoredInsert) {
        if let Some(index) = self.anchor_index(insert) {
            for value in insert.values.iter().rev() {
                if self.accept(value) {
                    debug!("Inserting {} before {} in {}", value, insert.anchor, self.target);
                    self.list.insert(index, RecipeEntry::bare(value.as_str()));
                    self.inserted += 1;
                }
            }
        }
    }

    fn after(&mut self, insert: &AnchoredInsert) {
        if let Some(index) = self.anchor_index(insert) {
            self.insert_at(index + 1, &insert.values);
        }
    }

    fn anchor_index(&mut self, insert: &AnchoredInsert) -> Option<usize> {
        let index = self.position(&insert.anchor);
        if index.is_none() {
            self.diagnostics.warn(Warning::AnchorNotFound {
                target: self.target.to_string(),
                anchor: insert.anchor.clone(),
            });
            self.skipped += insert.values.len();
        }
        index
    }

    /// Insert accepted values starting at `index`, advancing past each one.
    fn insert_at(&mut self, mut index: usize, values: &[String]) {
        for value in values {
            if self.accept(value) {
                debug!("Inserting {} at position {} of {}", value, index, self.target);
                self.list.insert(index, RecipeEntry::bare(value.as_str()));
                self.inserted += 1;
                index += 1;
            }
        }
    }
}
