//! Property-based tests for recipe list editing.
//!
//! Lists are generated without duplicate names, the same shape real recipe
//! lists have after merging.

#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;

    use crate::diagnostics::Diagnostics;
    use crate::editor::apply_edit;
    use crate::model::{AnchoredInsert, OrderEdit, RecipeDocument};
    use proptest::prelude::*;

    fn unique_names(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::hash_set("[A-H][0-9]", 0..max).prop_map(|set| {
            let mut names: Vec<String> = set.into_iter().collect();
            names.sort();
            names
        })
    }

    fn target(names: &[String]) -> Vec<RecipeDocument> {
        vec![RecipeDocument::new("Main").with_entries(names.iter().cloned())]
    }

    fn apply(docs: &mut [RecipeDocument], edit: &OrderEdit) {
        apply_edit(docs, edit, &mut Diagnostics::new());
    }

    proptest! {
        /// Property: editing never introduces duplicate names
        #[test]
        fn edits_never_create_duplicates(
            list in unique_names(8),
            first in prop::collection::vec("[A-H][0-9]", 0..4),
            last in prop::collection::vec("[A-H][0-9]", 0..4),
            anchor_values in prop::collection::vec("[A-H][0-9]", 0..4),
        ) {
            let mut docs = target(&list);
            let mut edit = OrderEdit::new("Main");
            edit.first = first;
            edit.last = last;
            if let Some(anchor) = list.first() {
                edit.before.push(AnchoredInsert::new(anchor.clone(), anchor_values.clone()));
                edit.after.push(AnchoredInsert::new(anchor.clone(), anchor_values));
            }
            apply(&mut docs, &edit);

            let names = docs[0].entry_names();
            let unique: HashSet<_> = names.iter().collect();
            prop_assert_eq!(unique.len(), names.len());
        }

        /// Property: existing entries keep their relative order
        #[test]
        fn existing_order_is_preserved(
            list in unique_names(8),
            first in prop::collection::vec("[A-H][0-9]", 0..4),
            last in prop::collection::vec("[A-H][0-9]", 0..4),
        ) {
            let mut docs = target(&list);
            let mut edit = OrderEdit::new("Main");
            edit.first = first;
            edit.last = last;
            apply(&mut docs, &edit);

            let kept: Vec<&str> = docs[0]
                .entry_names()
                .into_iter()
                .filter(|name| list.iter().any(|orig| orig == name))
                .collect();
            let expected: Vec<&str> = list.iter().map(String::as_str).collect();
            prop_assert_eq!(kept, expected);
        }

        /// Property: every value either was already present or is inserted
        #[test]
        fn all_values_end_up_in_the_list(
            list in unique_names(8),
            values in prop::collection::vec("[A-H][0-9]", 0..6),
        ) {
            let mut docs = target(&list);
            let mut edit = OrderEdit::new("Main");
            edit.last = values.clone();
            apply(&mut docs, &edit);

            let names = docs[0].entry_names();
            for value in &values {
                prop_assert!(names.contains(&value.as_str()));
            }
        }

        /// Property: an unknown anchor leaves the list untouched
        #[test]
        fn unknown_anchor_is_a_no_op(
            list in unique_names(8),
            values in prop::collection::vec("[A-H][0-9]", 1..4),
        ) {
            let mut docs = target(&list);
            let mut edit = OrderEdit::new("Main");
            edit.before.push(AnchoredInsert::new("Z9", values.clone()));
            edit.after.push(AnchoredInsert::new("Z9", values));
            apply(&mut docs, &edit);

            let expected: Vec<&str> = list.iter().map(String::as_str).collect();
            prop_assert_eq!(docs[0].entry_names(), expected);
        }

        /// Property: fresh `before` values sit directly in front of the anchor
        #[test]
        fn before_places_values_adjacent_to_anchor(
            list in unique_names(6).prop_filter("needs an anchor", |l| !l.is_empty()),
            count in 1usize..4,
        ) {
            let anchor = list[list.len() / 2].clone();
            let values: Vec<String> = (0..count).map(|i| format!("New{}", i)).collect();
            let mut docs = target(&list);
            let mut edit = OrderEdit::new("Main");
            edit.before.push(AnchoredInsert::new(anchor.clone(), values.clone()));
            apply(&mut docs, &edit);

            let names = docs[0].entry_names();
            let at = names.iter().position(|n| *n == anchor).unwrap();
            let expected: Vec<&str> = values.iter().map(String::as_str).collect();
            prop_assert_eq!(&names[at - count..at], expected.as_slice());
        }
    }
}
