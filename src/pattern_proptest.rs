//! Property-based tests for glob pattern matching.

#[cfg(test)]
mod proptest_tests {
    use crate::pattern::matches;
    use proptest::prelude::*;

    // Alternatives never contain commas or surrounding whitespace
    const ALTERNATIVE: &str = "[a-z0-9.*?-]{1,8}";
    const VALUE: &str = "[a-z0-9.-]{0,10}";

    proptest! {
        /// Property: a list matches iff one of its alternatives matches
        #[test]
        fn list_matches_iff_some_alternative_matches(
            alternatives in prop::collection::vec(ALTERNATIVE, 1..4),
            value in VALUE,
        ) {
            let pattern = alternatives.join(",");
            let any = alternatives.iter().any(|alt| matches(Some(alt.as_str()), Some(value.as_str())));
            prop_assert_eq!(matches(Some(pattern.as_str()), Some(value.as_str())), any);
        }

        /// Property: a pattern without wildcards only matches itself
        #[test]
        fn literal_pattern_matches_only_itself(literal in "[a-z0-9.-]{1,10}", value in VALUE) {
            prop_assert_eq!(matches(Some(literal.as_str()), Some(value.as_str())), literal == value);
        }

        /// Property: an absent pattern and `*` match every value
        #[test]
        fn match_all_accepts_everything(value in ".*") {
            prop_assert!(matches(None, Some(value.as_str())));
            prop_assert!(matches(Some("*"), Some(value.as_str())));
        }

        /// Property: `prefix*` behaves like starts_with
        #[test]
        fn trailing_star_is_prefix_match(prefix in "[a-z.-]{0,5}", value in VALUE) {
            let pattern = format!("{}*", prefix);
            prop_assert_eq!(matches(Some(pattern.as_str()), Some(value.as_str())), value.starts_with(&prefix));
        }

        /// Property: each `?` consumes exactly one character
        #[test]
        fn question_marks_match_exact_length(count in 1usize..6, value in VALUE) {
            let pattern = "?".repeat(count);
            prop_assert_eq!(matches(Some(pattern.as_str()), Some(value.as_str())), value.chars().count() == count);
        }

        /// Property: an absent value never matches a concrete pattern
        #[test]
        fn absent_value_never_matches(alternative in "[a-z0-9.-]{1,8}") {
            prop_assert!(!matches(Some(alternative.as_str()), None));
        }
    }
}
