//! Glob matching for project identifiers
//!
//! Rule tables select rules by matching a project's `groupId` and
//! `artifactId` against glob patterns. A pattern may list several
//! alternatives separated by commas (`my-service, *-api`); the match succeeds
//! when any alternative matches the whole value.
//!
//! Only two wildcards are recognised: `*` (any run of characters, including
//! none) and `?` (exactly one character). Every other character, `.`
//! included, is literal.

use log::debug;
use regex::Regex;

use crate::error::Result;

/// The pattern that matches every value, including an absent one.
pub const MATCH_ALL: &str = "*";

/// A compiled, possibly comma-separated glob pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    alternatives: Vec<Regex>,
    match_all: bool,
}

impl GlobPattern {
    /// Compile `pattern` into its alternatives.
    ///
    /// Blank alternatives (`"a,,b"`, a trailing comma) are ignored. A pattern
    /// that is exactly `*` is flagged as match-all so that it also accepts an
    /// absent value.
    pub fn new(pattern: &str) -> Result<Self> {
        let match_all = pattern == MATCH_ALL;
        let alternatives = pattern
            .split(',')
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .map(glob_to_regex)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source: pattern.to_string(),
            alternatives,
            match_all,
        })
    }

    /// Check `value` against every alternative.
    pub fn matches(&self, value: Option<&str>) -> bool {
        if self.match_all {
            return true;
        }
        let Some(value) = value else {
            return false;
        };

        for (alternative, regex) in self.source_alternatives().zip(&self.alternatives) {
            let matched = regex.is_match(value);
            debug!(
                "Pattern match: pattern={}, value={}, result={}",
                alternative, value, matched
            );
            if matched {
                return true;
            }
        }
        false
    }

    fn source_alternatives(&self) -> impl Iterator<Item = &str> {
        self.source
            .split(',')
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
    }
}

/// Convert a single glob alternative into an anchored regex.
fn glob_to_regex(glob: &str) -> Result<Regex> {
    let mut regex = String::with_capacity(glob.len() + 8);
    regex.push_str("^(?s:");
    for ch in glob.chars() {
        match ch {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            _ => regex.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4]))),
        }
    }
    regex.push_str(")$");
    Ok(Regex::new(&regex)?)
}

/// Match `value` against an optional glob `pattern`.
///
/// An absent pattern, or `*`, matches everything. Otherwise an absent value
/// never matches.
///
/// # Examples
///
/// ```
/// use recipe_prepare::pattern::matches;
///
/// assert!(matches(None, Some("anything")));
/// assert!(matches(Some("my-*-svc"), Some("my-app-svc")));
/// assert!(!matches(Some("my-*-svc"), Some("other-app-svc")));
/// assert!(matches(Some("billing, *-api"), Some("orders-api")));
/// ```
pub fn matches(pattern: Option<&str>, value: Option<&str>) -> bool {
    let Some(pattern) = pattern else {
        return true;
    };
    match GlobPattern::new(pattern) {
        Ok(compiled) => compiled.matches(value),
        // Every literal is escaped, so compilation only fails on size limits.
        Err(err) => {
            log::warn!("Ignoring uncompilable pattern '{}': {}", pattern, err);
            false
        }
    }
}
