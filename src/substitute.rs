//! Placeholder substitution
//!
//! Resolves `${name}` and `$name` placeholders in generated recipe text
//! against a [`VariableMap`]. Names start with a letter or underscore and
//! continue with letters, digits, underscores and dots.
//!
//! Two passes run in sequence. The braced form is replaced first, then the bare
//! form is replaced over the result, so the text of a resolved value is never
//! rescanned for braced placeholders. Unknown names stay in the text verbatim
//! and are reported as [`Warning::UnresolvedVariable`].

use std::collections::BTreeMap;
use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use log::{debug, info};
use regex::{Captures, Regex};

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::Result;

const BRACED: &str = r"\$\{([a-zA-Z_][a-zA-Z0-9_.]*)\}";
const BARE: &str = r"\$([a-zA-Z_][a-zA-Z0-9_.]*)\b";

/// Flat, case-sensitive mapping of variable names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMap {
    values: BTreeMap<String, String>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties-style text.
    ///
    /// The key ends at the first unescaped `=`, `:` or whitespace, so
    /// `key=value`, `key: value` and `key value` are all accepted. Blank lines
    /// and lines starting with `#` or `!` are ignored. A line ending in an
    /// unescaped `\` continues on the next one. `\t`, `\n`, `\r`, `\f` and
    /// `\uXXXX` escapes are decoded, any other escaped character stands for
    /// itself. Trailing whitespace of a value is dropped. A line without a
    /// separator defines an empty value. Later definitions override earlier
    /// ones.
    pub fn parse(text: &str) -> Self {
        let mut map = Self::new();
        for line in logical_lines(text) {
            let (key, value) = split_entry(&line);
            if key.is_empty() {
                debug!("Ignoring variable map line without a key: {}", line);
                continue;
            }
            map.insert(key, value);
        }
        map
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let map = Self::parse(&text);
        info!("Loaded {} variable(s) from {}", map.len(), path.display());
        Ok(map)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with('!')
}

/// Join continued lines and drop blank and comment lines.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut continuing = false;
    for raw in text.lines() {
        let piece = raw.trim_start();
        if !continuing && (piece.is_empty() || is_comment(piece)) {
            continue;
        }
        let backslashes = piece.chars().rev().take_while(|&c| c == '\\').count();
        continuing = backslashes % 2 == 1;
        if continuing {
            current.push_str(&piece[..piece.len() - 1]);
        } else {
            current.push_str(piece);
            lines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split a logical line into its unescaped key and value.
fn split_entry(line: &str) -> (String, String) {
    let mut chars = line.chars().peekable();
    let mut key = String::new();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => key.extend(unescape(&mut chars)),
            '=' | ':' => break,
            c if c.is_whitespace() => {
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
                chars.next_if(|&c| c == '=' || c == ':');
                break;
            }
            c => key.push(c),
        }
    }
    while chars.next_if(|c| c.is_whitespace()).is_some() {}

    let mut value = String::new();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => value.extend(unescape(&mut chars)),
            c => value.push(c),
        }
    }
    let trimmed = value.trim_end().len();
    value.truncate(trimmed);
    (key, value)
}

/// Decode the character after a `\`.
fn unescape(chars: &mut Peekable<Chars<'_>>) -> Option<char> {
    let decoded = match chars.next()? {
        't' => '\t',
        'n' => '\n',
        'r' => '\r',
        'f' => '\u{0c}',
        'u' => {
            let hex: String = (0..4)
                .filter_map(|_| chars.next_if(char::is_ascii_hexdigit))
                .collect();
            return u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32);
        }
        other => other,
    };
    Some(decoded)
}

/// Result of substituting one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    /// Placeholder occurrences whose name was in the map.
    pub resolved: usize,
    /// Placeholder occurrences left in place.
    pub unresolved: usize,
}

/// Compiled placeholder patterns.
#[derive(Debug, Clone)]
pub struct Placeholders {
    braced: Regex,
    bare: Regex,
}

impl Placeholders {
    pub fn new() -> Result<Self> {
        Ok(Self {
            braced: Regex::new(BRACED)?,
            bare: Regex::new(BARE)?,
        })
    }

    /// Run both passes over `text`.
    pub fn substitute(
        &self,
        text: &str,
        variables: &VariableMap,
        diagnostics: &mut Diagnostics,
    ) -> Substitution {
        let mut resolved = 0;
        let mut unresolved = 0;

        let mut pass = |regex: &Regex, input: &str| -> String {
            regex
                .replace_all(input, |caps: &Captures| {
                    let name = &caps[1];
                    match variables.get(name) {
                        Some(value) => {
                            resolved += 1;
                            value.to_string()
                        }
                        None => {
                            unresolved += 1;
                            diagnostics.warn(Warning::UnresolvedVariable {
                                name: name.to_string(),
                            });
                            caps[0].to_string()
                        }
                    }
                })
                .into_owned()
        };

        let braced = pass(&self.braced, text);
        let text = pass(&self.bare, &braced);

        Substitution {
            text,
            resolved,
            unresolved,
        }
    }
}

/// Substitute placeholders in `text` with freshly compiled patterns.
///
/// ```
/// use recipe_prepare::diagnostics::Diagnostics;
/// use recipe_prepare::substitute::{substitute, VariableMap};
///
/// let variables: VariableMap = [("app.name", "MyApplication")].into_iter().collect();
/// let result = substitute("${app.name} and $app.name", &variables, &mut Diagnostics::new()).unwrap();
/// assert_eq!(result.text, "MyApplication and MyApplication");
/// assert_eq!(result.resolved, 2);
/// ```
pub fn substitute(
    text: &str,
    variables: &VariableMap,
    diagnostics: &mut Diagnostics,
) -> Result<Substitution> {
    Ok(Placeholders::new()?.substitute(text, variables, diagnostics))
}

/// Outcome of substituting one file in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileSubstitution {
    pub changed: bool,
    pub resolved: usize,
    pub unresolved: usize,
}

/// Substitute placeholders in the file at `path`, rewriting it only when the
/// text changed.
pub fn substitute_file(
    path: &Path,
    placeholders: &Placeholders,
    variables: &VariableMap,
    diagnostics: &mut Diagnostics,
) -> Result<FileSubstitution> {
    let original = fs::read_to_string(path)?;
    let result = placeholders.substitute(&original, variables, diagnostics);
    let changed = result.text != original;
    if changed {
        fs::write(path, &result.text)?;
        info!(
            "Resolved {} placeholder(s) in {}",
            result.resolved,
            path.display()
        );
    } else {
        debug!("No changes to {}", path.display());
    }
    Ok(FileSubstitution {
        changed,
        resolved: result.resolved,
        unresolved: result.unresolved,
    })
}
