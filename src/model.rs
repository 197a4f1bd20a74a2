//! # Document Model
//!
//! In-memory forms of everything the engine reads and writes:
//!
//! - [`Rule`]: one entry of the merge rule table.
//! - [`RecipeDocument`]: a named recipe with an ordered [`RecipeEntry`] list.
//! - [`MergeDocument`]: a carrier for [`OrderEdit`]s, never written out.
//! - [`OrderEdit`]: `first`/`last`/`before`/`after` insertions into one
//!   recipe's list.
//!
//! ## Normalization
//!
//! The YAML these come from is loose. A recipe entry may be a bare string or
//! a single-key mapping; an edit's values may be a string, a list, or a list
//! of lists. Every decoder here starts from a generic [`serde_yaml::Value`]
//! and produces one canonical shape, so nothing downstream has to look at raw
//! YAML again. Serialization goes the other way: a [`RecipeEntry`] without
//! attributes is written back as a bare string, and empty optional fields of
//! a [`RecipeDocument`] are omitted.

use log::{debug, warn};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::{Error, Result};

/// `type` value that marks a document as a [`MergeDocument`].
pub const MERGE_TYPE: &str = "org.yourcompany.openrewrite/v1/merge";

/// Decoding failures carry only a message; callers attach context.
type Decode<T> = std::result::Result<T, String>;

/// One step in a recipe's `recipeList`.
///
/// Deduplication and anchoring compare entries by [`name`](Self::name) only;
/// `PartialEq` compares the attributes too.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeEntry {
    pub name: String,
    /// Recipe options in their original order.
    pub attributes: Mapping,
}

impl RecipeEntry {
    /// An entry without attributes.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Mapping::new(),
        }
    }

    pub fn with_attributes(name: impl Into<String>, attributes: Mapping) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    /// Normalize one raw `recipeList` item.
    ///
    /// Accepts `- com.example.Recipe` and `- com.example.Recipe: {opt: 1}`.
    /// A single-key mapping whose value is not a mapping (`- Recipe:` or
    /// `- Recipe: 3`) yields an entry without attributes. Any other shape
    /// returns `None`.
    pub fn from_value(value: &YamlValue) -> Option<Self> {
        match value {
            YamlValue::String(name) if !name.trim().is_empty() => Some(Self::bare(name.clone())),
            YamlValue::Mapping(map) if map.len() == 1 => {
                let (key, config) = map.iter().next()?;
                let name = key.as_str().filter(|name| !name.trim().is_empty())?;
                let attributes = match config {
                    YamlValue::Mapping(attributes) => attributes.clone(),
                    _ => Mapping::new(),
                };
                Some(Self::with_attributes(name, attributes))
            }
            _ => None,
        }
    }

    /// Denormalize to the YAML shape this entry is written as.
    pub fn to_value(&self) -> YamlValue {
        if self.attributes.is_empty() {
            YamlValue::String(self.name.clone())
        } else {
            let mut map = Mapping::new();
            map.insert(
                YamlValue::String(self.name.clone()),
                YamlValue::Mapping(self.attributes.clone()),
            );
            YamlValue::Mapping(map)
        }
    }
}

impl Serialize for RecipeEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.attributes.is_empty() {
            serializer.serialize_str(&self.name)
        } else {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(&self.name, &self.attributes)?;
            map.end()
        }
    }
}

/// A named migration recipe.
///
/// Field order matches the order keys are written in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDocument {
    #[serde(rename = "type", skip_serializing_if = "is_blank")]
    pub doc_type: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub estimated_effort_per_occurrence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub causes_another_cycle: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub preconditions: Vec<YamlValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<YamlValue>,
    #[serde(skip_serializing_if = "is_none_or_empty")]
    pub recipe_list: Option<Vec<RecipeEntry>>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

fn is_none_or_empty<T>(value: &Option<Vec<T>>) -> bool {
    value.as_ref().is_none_or(Vec::is_empty)
}

impl RecipeDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper for tests and callers assembling documents.
    pub fn with_entries<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recipe_list = Some(names.into_iter().map(RecipeEntry::bare).collect());
        self
    }

    /// Decode a recipe document from a top-level YAML mapping.
    ///
    /// Returns `Ok(None)` when the document has no usable `name`; such
    /// documents are dropped rather than reported. Unknown keys are ignored.
    pub fn from_mapping(map: &Mapping) -> Result<Option<Self>> {
        Self::decode(map).map_err(Error::document)
    }

    fn decode(map: &Mapping) -> Decode<Option<Self>> {
        let Some(name) = scalar_field(map, "name")?.filter(|name| !name.trim().is_empty()) else {
            debug!("Dropping recipe document without a name");
            return Ok(None);
        };

        let recipe_list = match map.get("recipeList") {
            None | Some(YamlValue::Null) => None,
            Some(YamlValue::Sequence(items)) => Some(normalize_recipe_list(&name, items)),
            Some(other) => {
                return Err(format!(
                    "recipeList of {} must be a list, found {}",
                    name,
                    yaml_type_name(other)
                ))
            }
        };

        for key in map.keys() {
            if let Some(key) = key.as_str() {
                if !RECIPE_KEYS.contains(&key) {
                    debug!("Ignoring unknown key '{}' in recipe {}", key, name);
                }
            }
        }

        Ok(Some(Self {
            doc_type: scalar_field(map, "type")?,
            display_name: scalar_field(map, "displayName")?,
            description: scalar_field(map, "description")?,
            tags: scalar_list_field(map, "tags")?,
            estimated_effort_per_occurrence: scalar_field(map, "estimatedEffortPerOccurrence")?,
            causes_another_cycle: bool_field(map, "causesAnotherCycle")?,
            preconditions: node_list_field(map, "preconditions")?,
            exclusions: node_list_field(map, "exclusions")?,
            recipe_list,
            name,
        }))
    }

    /// Entry names in list order.
    pub fn entry_names(&self) -> Vec<&str> {
        self.recipe_list
            .iter()
            .flatten()
            .map(|entry| entry.name.as_str())
            .collect()
    }

    /// The recipe list, created empty if it was absent.
    pub fn recipe_list_mut(&mut self) -> &mut Vec<RecipeEntry> {
        self.recipe_list.get_or_insert_with(Vec::new)
    }
}

const RECIPE_KEYS: &[&str] = &[
    "type",
    "name",
    "displayName",
    "description",
    "tags",
    "estimatedEffortPerOccurrence",
    "causesAnotherCycle",
    "preconditions",
    "exclusions",
    "recipeList",
];

fn normalize_recipe_list(recipe: &str, items: &[YamlValue]) -> Vec<RecipeEntry> {
    items
        .iter()
        .filter_map(|item| {
            let entry = RecipeEntry::from_value(item);
            if entry.is_none() {
                warn!(
                    "Dropping unrecognised recipeList item in {}: {:?}",
                    recipe, item
                );
            }
            entry
        })
        .collect()
}

/// A `before`/`after` insertion: `values` go next to `anchor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchoredInsert {
    pub anchor: String,
    pub values: Vec<String>,
}

impl AnchoredInsert {
    pub fn new<I, S>(anchor: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            anchor: anchor.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// An `updateRecipeList` instruction.
///
/// Regardless of how the source YAML ordered its steps, the editor applies
/// `first`, then `last`, then `before`, then `after`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderEdit {
    /// Name of the recipe document whose list is edited.
    pub target_name: String,
    pub first: Vec<String>,
    pub last: Vec<String>,
    pub before: Vec<AnchoredInsert>,
    pub after: Vec<AnchoredInsert>,
}

impl OrderEdit {
    pub fn new(target_name: impl Into<String>) -> Self {
        Self {
            target_name: target_name.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.last.is_empty() && self.before.is_empty() && self.after.is_empty()
    }

    /// Decode the body of an `updateRecipeList` key.
    ///
    /// ```yaml
    /// name: com.example.Main
    /// updateOrder:
    ///   - first: [com.example.Setup]
    ///   - before:
    ///       - com.example.Build: [com.example.Lint]
    /// ```
    pub fn from_value(value: &YamlValue) -> Result<Self> {
        Self::decode(value).map_err(Error::document)
    }

    fn decode(value: &YamlValue) -> Decode<Self> {
        let YamlValue::Mapping(map) = value else {
            return Err(format!(
                "updateRecipeList must be a mapping, found {}",
                yaml_type_name(value)
            ));
        };

        let target_name = scalar_field(map, "name")?
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| "updateRecipeList.name is required and must not be empty".to_string())?;

        let mut edit = Self::new(target_name);
        match map.get("updateOrder") {
            None | Some(YamlValue::Null) => {}
            Some(YamlValue::Sequence(steps)) => {
                for step in steps {
                    match step {
                        YamlValue::Mapping(step) => edit.apply_step(step)?,
                        YamlValue::Null => {}
                        other => {
                            return Err(format!(
                                "updateOrder steps must be mappings, found {}",
                                yaml_type_name(other)
                            ))
                        }
                    }
                }
            }
            Some(YamlValue::Mapping(step)) => edit.apply_step(step)?,
            Some(other) => {
                return Err(format!(
                    "updateOrder must be a list, found {}",
                    yaml_type_name(other)
                ))
            }
        }
        Ok(edit)
    }

    /// Fold one `updateOrder` step into the edit. A key seen in an earlier
    /// step is replaced, not extended.
    fn apply_step(&mut self, step: &Mapping) -> Decode<()> {
        for (key, value) in step {
            match key.as_str() {
                Some("first") => self.first = parse_values("first", value)?,
                Some("last") => self.last = parse_values("last", value)?,
                Some("before") => self.before = parse_anchored("before", value)?,
                Some("after") => self.after = parse_anchored("after", value)?,
                _ => warn!(
                    "Ignoring unknown updateOrder key {:?} for {} (expected first, last, before or after)",
                    key, self.target_name
                ),
            }
        }
        Ok(())
    }
}

/// `first`/`last` values: a string, a list of strings, or nested lists.
fn parse_values(key: &str, value: &YamlValue) -> Decode<Vec<String>> {
    let mut values = Vec::new();
    match value {
        YamlValue::Null => {}
        YamlValue::Sequence(items) => {
            for item in items {
                match item {
                    YamlValue::Null => {}
                    YamlValue::Sequence(inner) => {
                        for value in inner {
                            values.push(scalar_text(value).ok_or_else(|| {
                                format!("'{}' values must be recipe names", key)
                            })?);
                        }
                    }
                    other => values.push(scalar_text(other).ok_or_else(|| {
                        format!(
                            "'{}' values must be recipe names, found {}",
                            key,
                            yaml_type_name(other)
                        )
                    })?),
                }
            }
        }
        other => values.push(scalar_text(other).ok_or_else(|| {
            format!(
                "'{}' must list recipe names, found {}",
                key,
                yaml_type_name(other)
            )
        })?),
    }
    Ok(values)
}

/// `before`/`after` values: `{anchor: values}` mappings, bare or in a list.
fn parse_anchored(key: &str, value: &YamlValue) -> Decode<Vec<AnchoredInsert>> {
    let mut inserts = Vec::new();
    match value {
        YamlValue::Null => {}
        YamlValue::Mapping(map) => push_anchored(key, map, &mut inserts)?,
        YamlValue::Sequence(items) => {
            for item in items {
                match item {
                    YamlValue::Mapping(map) => push_anchored(key, map, &mut inserts)?,
                    YamlValue::Null => {}
                    other => {
                        return Err(format!(
                            "'{}' entries must map an anchor recipe to values, found {}",
                            key,
                            yaml_type_name(other)
                        ))
                    }
                }
            }
        }
        other => {
            return Err(format!(
                "'{}' must map anchor recipes to values, found {}",
                key,
                yaml_type_name(other)
            ))
        }
    }
    Ok(inserts)
}

fn push_anchored(key: &str, map: &Mapping, inserts: &mut Vec<AnchoredInsert>) -> Decode<()> {
    for (anchor, values) in map {
        let anchor = scalar_text(anchor)
            .filter(|anchor| !anchor.trim().is_empty())
            .ok_or_else(|| format!("'{}' anchors must be non-empty recipe names", key))?;
        inserts.push(AnchoredInsert {
            anchor,
            values: parse_values(key, values)?,
        });
    }
    Ok(())
}

/// A document of type [`MERGE_TYPE`]: edits to apply to other documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeDocument {
    /// Display name only; nothing is looked up by it.
    pub name: Option<String>,
    pub edits: Vec<OrderEdit>,
}

impl MergeDocument {
    /// Decode from a top-level mapping whose `type` is [`MERGE_TYPE`].
    ///
    /// Edits live under `rules`, one `updateRecipeList` per item. Items
    /// without that key are ignored.
    pub fn from_mapping(map: &Mapping) -> Result<Self> {
        Self::decode(map).map_err(Error::document)
    }

    fn decode(map: &Mapping) -> Decode<Self> {
        let name = scalar_field(map, "name")?;
        let mut edits = Vec::new();
        match map.get("rules") {
            None | Some(YamlValue::Null) => {}
            Some(YamlValue::Sequence(items)) => {
                for item in items {
                    match item.get("updateRecipeList") {
                        Some(body) => edits.push(OrderEdit::decode(body)?),
                        None => debug!(
                            "Ignoring merge rule without updateRecipeList in {}",
                            name.as_deref().unwrap_or("<unnamed>")
                        ),
                    }
                }
            }
            Some(other) => {
                return Err(format!(
                    "merge document rules must be a list, found {}",
                    yaml_type_name(other)
                ))
            }
        }
        Ok(Self { name, edits })
    }
}

/// A decoded document from a recipe file.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Recipe(RecipeDocument),
    Merge(MergeDocument),
}

impl Document {
    /// Decode one YAML document, choosing the variant by its `type` key.
    ///
    /// Returns `Ok(None)` for empty documents and for recipe documents
    /// without a name.
    pub fn from_value(value: &YamlValue) -> Result<Option<Self>> {
        match value {
            YamlValue::Null => Ok(None),
            YamlValue::Mapping(map) => {
                if map.get("type").and_then(YamlValue::as_str) == Some(MERGE_TYPE) {
                    MergeDocument::from_mapping(map).map(|doc| Some(Document::Merge(doc)))
                } else {
                    RecipeDocument::from_mapping(map).map(|doc| doc.map(Document::Recipe))
                }
            }
            other => Err(Error::document(format!(
                "expected a mapping at the top level, found {}",
                yaml_type_name(other)
            ))),
        }
    }
}

/// One entry of the merge rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Glob pattern for the project's artifactId. Required.
    pub artifact_id: String,
    /// Glob pattern for the project's groupId. `None` matches every group.
    pub group_id: Option<String>,
    /// Recipe files to merge, relative to the recipe directory.
    pub merge_files: Vec<String>,
    /// Edit applied after all merge documents' edits.
    pub edit: Option<OrderEdit>,
}

impl Rule {
    /// Decode and validate one rule; `index` is 1-based.
    pub fn from_value(index: usize, value: &YamlValue) -> Result<Self> {
        Self::decode(value).map_err(|message| Error::InvalidRule { index, message })
    }

    fn decode(value: &YamlValue) -> Decode<Self> {
        let YamlValue::Mapping(map) = value else {
            return Err(format!(
                "a rule must be a mapping, found {}",
                yaml_type_name(value)
            ));
        };

        let artifact_id = scalar_field(map, "artifactId")?
            .filter(|pattern| !pattern.trim().is_empty())
            .ok_or_else(|| "artifactId is required and must not be empty".to_string())?;

        let group_id = scalar_field(map, "groupId")?.filter(|pattern| !pattern.trim().is_empty());

        let merge_files = scalar_list_field(map, "mergeFiles")?;
        if merge_files.is_empty() {
            return Err("mergeFiles is required and must list at least one file".to_string());
        }
        if merge_files.iter().any(|file| file.trim().is_empty()) {
            return Err("mergeFiles must not contain empty paths".to_string());
        }

        let edit = match map.get("updateRecipeList") {
            None | Some(YamlValue::Null) => None,
            Some(body) => Some(OrderEdit::decode(body)?),
        };

        Ok(Self {
            artifact_id,
            group_id,
            merge_files,
            edit,
        })
    }
}

// Field helpers

/// Text of a scalar node; `None` for null, sequences and mappings.
fn scalar_text(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Tagged(tagged) => scalar_text(&tagged.value),
        YamlValue::Null | YamlValue::Sequence(_) | YamlValue::Mapping(_) => None,
    }
}

fn scalar_field(map: &Mapping, key: &str) -> Decode<Option<String>> {
    match map.get(key) {
        None | Some(YamlValue::Null) => Ok(None),
        Some(value) => scalar_text(value).map(Some).ok_or_else(|| {
            format!(
                "'{}' must be a scalar, found {}",
                key,
                yaml_type_name(value)
            )
        }),
    }
}

fn bool_field(map: &Mapping, key: &str) -> Decode<Option<bool>> {
    match map.get(key) {
        None | Some(YamlValue::Null) => Ok(None),
        Some(YamlValue::Bool(b)) => Ok(Some(*b)),
        Some(YamlValue::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(YamlValue::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(other) => Err(format!(
            "'{}' must be true or false, found {}",
            key,
            yaml_type_name(other)
        )),
    }
}

fn scalar_list_field(map: &Mapping, key: &str) -> Decode<Vec<String>> {
    match map.get(key) {
        None | Some(YamlValue::Null) => Ok(Vec::new()),
        Some(YamlValue::Sequence(items)) => items
            .iter()
            .map(|item| {
                scalar_text(item).ok_or_else(|| {
                    format!(
                        "'{}' items must be scalars, found {}",
                        key,
                        yaml_type_name(item)
                    )
                })
            })
            .collect(),
        Some(other) => Err(format!(
            "'{}' must be a list, found {}",
            key,
            yaml_type_name(other)
        )),
    }
}

fn node_list_field(map: &Mapping, key: &str) -> Decode<Vec<YamlValue>> {
    match map.get(key) {
        None | Some(YamlValue::Null) => Ok(Vec::new()),
        Some(YamlValue::Sequence(items)) => Ok(items.clone()),
        Some(other) => Err(format!(
            "'{}' must be a list, found {}",
            key,
            yaml_type_name(other)
        )),
    }
}

/// Human-readable type name for a YAML value, used in error messages.
pub fn yaml_type_name(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a list",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}
