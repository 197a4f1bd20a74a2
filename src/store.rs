//! # Document Store
//!
//! Reading and writing of the two YAML file kinds the engine deals with:
//! the merge rule table and multi-document recipe files.
//!
//! Rule tables are all-or-nothing: any problem is returned as an error naming
//! the offending rule. Recipe files are tolerant at document granularity. The
//! text is split on `---` boundaries before parsing, and a document that fails
//! to parse or decode is recorded as a
//! [`Warning::MalformedDocument`](crate::diagnostics::Warning) while its
//! siblings are still loaded.

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde_yaml::Value as YamlValue;

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, Result};
use crate::model::{yaml_type_name, Document, MergeDocument, RecipeDocument, Rule};

const RULES_HINT: &str = "A rule table starts with 'rules:' followed by a list of rules";

/// Documents loaded from one recipe file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFile {
    pub recipes: Vec<RecipeDocument>,
    pub merge_documents: Vec<MergeDocument>,
}

impl RecipeFile {
    /// Append another file's documents after this one's.
    pub fn extend(&mut self, other: RecipeFile) {
        self.recipes.extend(other.recipes);
        self.merge_documents.extend(other.merge_documents);
    }
}

/// Decode every rule in a rule table, keeping each rule's outcome.
///
/// The outer error covers problems with the file as a whole (bad YAML, no
/// `rules` list). An empty or `rules`-less table yields an empty list.
pub fn parse_rule_entries(text: &str) -> Result<Vec<Result<Rule>>> {
    let root: YamlValue = serde_yaml::from_str(text).map_err(|err| Error::ConfigParse {
        message: format!("invalid YAML in rule table: {}", err),
        hint: None,
    })?;

    let rules = match &root {
        YamlValue::Null => return Ok(Vec::new()),
        YamlValue::Mapping(map) => match map.get("rules") {
            None | Some(YamlValue::Null) => return Ok(Vec::new()),
            Some(YamlValue::Sequence(rules)) => rules,
            Some(other) => {
                return Err(Error::ConfigParse {
                    message: format!("'rules' must be a list, found {}", yaml_type_name(other)),
                    hint: Some(RULES_HINT.to_string()),
                })
            }
        },
        other => {
            return Err(Error::ConfigParse {
                message: format!(
                    "rule table must be a mapping, found {}",
                    yaml_type_name(other)
                ),
                hint: Some(RULES_HINT.to_string()),
            })
        }
    };

    Ok(rules
        .iter()
        .enumerate()
        .map(|(i, rule)| Rule::from_value(i + 1, rule))
        .collect())
}

/// Parse a rule table, failing on the first invalid rule.
pub fn parse_rule_table(text: &str) -> Result<Vec<Rule>> {
    parse_rule_entries(text)?.into_iter().collect()
}

/// Load the rule table at `path`.
///
/// Fails when the file is missing, does not parse, has an invalid rule, or
/// defines no rules at all.
pub fn load_rule_table(path: &Path) -> Result<Vec<Rule>> {
    if !path.is_file() {
        return Err(Error::RuleTableNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path)?;
    let rules = parse_rule_table(&text)?;
    if rules.is_empty() {
        return Err(Error::EmptyRuleTable {
            path: path.to_path_buf(),
        });
    }
    info!("Loaded {} merge rule(s) from {}", rules.len(), path.display());
    Ok(rules)
}

/// Split a YAML stream into the text of its documents.
///
/// A line starting with `---` followed by nothing, whitespace, or inline
/// content opens a new document; a line that is exactly `...` closes the
/// current one. Chunks holding only blank lines and comments are dropped.
pub fn split_documents(text: &str) -> Vec<String> {
    let mut documents = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("---") {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                push_chunk(&mut documents, std::mem::take(&mut current));
                let inline = rest.trim_start();
                if !inline.is_empty() {
                    current.push_str(inline);
                    current.push('\n');
                }
                continue;
            }
        }
        if line.trim_end() == "..." {
            push_chunk(&mut documents, std::mem::take(&mut current));
            continue;
        }
        current.push_str(line);
        current.push('\n');
    }
    push_chunk(&mut documents, current);
    documents
}

fn push_chunk(documents: &mut Vec<String>, chunk: String) {
    let has_content = chunk.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    });
    if has_content {
        documents.push(chunk);
    }
}

/// Decode every document of a recipe file.
///
/// `file` only labels warnings. Documents are routed by their `type`: merge
/// documents to [`RecipeFile::merge_documents`], everything else to
/// [`RecipeFile::recipes`]. Unnamed recipe documents are dropped.
pub fn parse_recipe_documents(
    text: &str,
    file: &Path,
    diagnostics: &mut Diagnostics,
) -> RecipeFile {
    let mut loaded = RecipeFile::default();

    for (i, chunk) in split_documents(text).iter().enumerate() {
        let decoded = serde_yaml::from_str::<YamlValue>(chunk)
            .map_err(Error::from)
            .and_then(|value| Document::from_value(&value));

        match decoded {
            Ok(Some(Document::Recipe(recipe))) => {
                debug!("Loaded recipe {} from {}", recipe.name, file.display());
                loaded.recipes.push(recipe);
            }
            Ok(Some(Document::Merge(merge))) => {
                debug!(
                    "Loaded merge document {} ({} edit(s)) from {}",
                    merge.name.as_deref().unwrap_or("<unnamed>"),
                    merge.edits.len(),
                    file.display()
                );
                loaded.merge_documents.push(merge);
            }
            Ok(None) => debug!("Skipping empty or unnamed document {} in {}", i + 1, file.display()),
            Err(err) => diagnostics.warn(Warning::MalformedDocument {
                file: file.to_path_buf(),
                index: i + 1,
                message: err.to_string(),
            }),
        }
    }

    loaded
}

/// Read and decode the recipe file at `path`.
pub fn load_recipe_file(path: &Path, diagnostics: &mut Diagnostics) -> Result<RecipeFile> {
    let text = fs::read_to_string(path)?;
    let loaded = parse_recipe_documents(&text, path, diagnostics);
    info!(
        "Read {} recipe(s) and {} merge document(s) from {}",
        loaded.recipes.len(),
        loaded.merge_documents.len(),
        path.display()
    );
    Ok(loaded)
}

/// Render recipe documents as one YAML stream, each preceded by `---`.
pub fn render_recipe_documents(documents: &[RecipeDocument]) -> Result<String> {
    let mut out = String::new();
    for document in documents {
        out.push_str("---\n");
        out.push_str(&serde_yaml::to_string(document)?);
    }
    Ok(out)
}

/// Write recipe documents to `path`, replacing any existing file.
pub fn write_recipe_documents(documents: &[RecipeDocument], path: &Path) -> Result<()> {
    let rendered = render_recipe_documents(documents)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| Error::Filesystem {
            message: format!("Failed to create directory {}: {}", parent.display(), err),
        })?;
    }
    fs::write(path, rendered).map_err(|err| Error::Filesystem {
        message: format!("Failed to write {}: {}", path.display(), err),
    })?;
    info!("Wrote {} recipe(s) to {}", documents.len(), path.display());
    Ok(())
}
