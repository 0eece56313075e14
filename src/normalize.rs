//! Schema normalization.
//!
//! Cleans up what the API platform emits so that downstream passes only see
//! standard JSON Schema type names and tidy property keys:
//! - leftover `$ref` / `$$ref` from Swagger imports are dropped
//! - arrays keep only their first item schema
//! - Java-style type names (`int`, `Long`, `BigDecimal`, ...) are mapped to
//!   JSON Schema names, with caller overrides
//! - property keys and `required` entries are trimmed

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;

use crate::schema::{Items, Path, Schema, SchemaNode, SchemaType};
use crate::walker::{walk, Visitor};

/// Built-in aliases, keyed by lower-case source name.
const BUILTIN_TYPE_MAPPING: &[(&str, &str)] = &[
    ("byte", "integer"),
    ("short", "integer"),
    ("int", "integer"),
    ("long", "integer"),
    ("float", "number"),
    ("double", "number"),
    ("bigdecimal", "number"),
    ("char", "string"),
    ("void", "null"),
];

/// Case-insensitive map from source type names to JSON Schema type names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    entries: HashMap<String, String>,
}

impl TypeMapping {
    /// The built-in table only.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_TYPE_MAPPING
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    /// The built-in table with `overrides` layered on top.
    ///
    /// Override keys are lower-cased; later entries win.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut mapping = Self::builtin();
        for (from, to) in overrides {
            mapping
                .entries
                .insert(from.as_ref().to_lowercase(), to.into());
        }
        mapping
    }

    /// Map one type name: lower-case it, then substitute if known.
    pub fn lookup(&self, name: &str) -> String {
        let lowered = name.to_lowercase();
        match self.entries.get(&lowered) {
            Some(mapped) => mapped.clone(),
            None => lowered,
        }
    }

    fn map_value(&self, value: &Value) -> Value {
        match value {
            Value::String(name) => Value::String(self.lookup(name)),
            other => other.clone(),
        }
    }
}

impl Default for TypeMapping {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Normalize a schema tree, returning the normalized tree.
///
/// Idempotent: normalizing twice gives the same tree as normalizing once.
pub fn normalize(schema: Schema, mapping: &TypeMapping) -> Schema {
    walk(schema, &mut Normalizer::new(mapping))
}

/// The per-node normalization pass.
pub struct Normalizer<'a> {
    mapping: &'a TypeMapping,
}

impl<'a> Normalizer<'a> {
    pub fn new(mapping: &'a TypeMapping) -> Self {
        Self { mapping }
    }
}

impl Visitor for Normalizer<'_> {
    fn visit(&mut self, node: &mut SchemaNode, _path: &Path) {
        node.reference = None;
        node.legacy_reference = None;

        if let Some(schema_type) = node.schema_type.take() {
            node.schema_type = Some(match schema_type {
                SchemaType::Single(value) => SchemaType::Single(self.mapping.map_value(&value)),
                SchemaType::Multiple(values) => SchemaType::Multiple(
                    values.iter().map(|v| self.mapping.map_value(v)).collect(),
                ),
            });
        }

        // Runs after type mapping; keeps normalization idempotent.
        if node.is_type("array") {
            collapse_items(node);
        }

        if let Some(properties) = node.properties.take() {
            node.properties = Some(trim_keys(properties));
            if let Some(Value::Array(required)) = node.required.as_mut() {
                for entry in required.iter_mut() {
                    if let Value::String(name) = entry {
                        let trimmed = name.trim();
                        if trimmed.len() != name.len() {
                            *name = trimmed.to_string();
                        }
                    }
                }
            }
        }
    }
}

/// Replace a non-empty `items` list with its first entry.
fn collapse_items(node: &mut SchemaNode) {
    if let Some(Items::Tuple(items)) = node.items.as_mut() {
        if !items.is_empty() {
            let first = items.remove(0);
            node.items = Some(Items::Single(first));
        }
    }
}

fn trim_keys(properties: IndexMap<String, Schema>) -> IndexMap<String, Schema> {
    let mut trimmed = IndexMap::with_capacity(properties.len());
    for (key, value) in properties {
        trimmed.insert(key.trim().to_string(), value);
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(value: Value) -> Value {
        normalize(Schema::from_value(value), &TypeMapping::builtin()).to_value()
    }

    #[test]
    fn builtin_lookup_is_case_insensitive() {
        let mapping = TypeMapping::builtin();
        for name in ["int", "INT", "Int", "iNt"] {
            assert_eq!(mapping.lookup(name), "integer");
        }
        assert_eq!(mapping.lookup("BigDecimal"), "number");
        assert_eq!(mapping.lookup("Void"), "null");
        assert_eq!(mapping.lookup("String"), "string");
    }

    #[test]
    fn unknown_names_pass_through_lowercased() {
        assert_eq!(TypeMapping::builtin().lookup("LocalDateTime"), "localdatetime");
    }

    #[test]
    fn overrides_win_and_are_case_folded() {
        let mapping = TypeMapping::with_overrides([("LONG", "string"), ("Date", "string")]);
        assert_eq!(mapping.lookup("long"), "string");
        assert_eq!(mapping.lookup("DATE"), "string");
        assert_eq!(mapping.lookup("int"), "integer");
    }

    #[test]
    fn removes_refs() {
        let out = run(json!({ "type": "string", "$ref": "#/x", "$$ref": "#/y" }));
        assert_eq!(out, json!({ "type": "string" }));
    }

    #[test]
    fn scalar_and_list_types_keep_shape() {
        assert_eq!(run(json!({ "type": "Long" })), json!({ "type": "integer" }));
        assert_eq!(
            run(json!({ "type": ["Double", "NULL", 7] })),
            json!({ "type": ["number", "null", 7] })
        );
    }

    #[test]
    fn collapses_array_items() {
        let out = run(json!({
            "type": "array",
            "items": [{ "type": "int" }, { "type": "string" }]
        }));
        assert_eq!(out, json!({ "type": "array", "items": { "type": "integer" } }));
    }

    #[test]
    fn keeps_tuple_items_without_array_type() {
        let out = run(json!({ "items": [{ "type": "int" }, { "type": "char" }] }));
        assert_eq!(
            out,
            json!({ "items": [{ "type": "integer" }, { "type": "string" }] })
        );
    }

    #[test]
    fn collapses_items_of_capitalized_array() {
        let out = run(json!({ "type": "Array", "items": [{ "type": "int" }, {}] }));
        assert_eq!(out, json!({ "type": "array", "items": { "type": "integer" } }));
    }

    #[test]
    fn empty_items_list_is_kept() {
        let out = run(json!({ "type": "array", "items": [] }));
        assert_eq!(out, json!({ "type": "array", "items": [] }));
    }

    #[test]
    fn trims_property_keys_and_required() {
        let out = run(json!({
            "type": "object",
            "properties": { " name ": { "type": "string" }, "id": { "type": "int" } },
            "required": [" name ", "id"]
        }));
        assert_eq!(
            out,
            json!({
                "type": "object",
                "properties": { "name": { "type": "string" }, "id": { "type": "integer" } },
                "required": ["name", "id"]
            })
        );
    }

    #[test]
    fn required_untouched_without_properties() {
        let out = run(json!({ "required": [" a "] }));
        assert_eq!(out, json!({ "required": [" a "] }));
    }

    #[test]
    fn idempotent() {
        let input = json!({
            "type": "Object",
            "properties": {
                " list ": {
                    "type": "array",
                    "items": [{ "type": "object", "properties": { " x": { "type": "Short" } } }]
                },
                "alt": { "oneOf": [{ "type": "Float" }, { "type": ["Char", "Void"] }] }
            },
            "required": [" list "]
        });
        let once = run(input);
        let twice = run(once.clone());
        assert_eq!(once, twice);
    }
}
