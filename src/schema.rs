//! Schema tree model.
//!
//! A JSON Schema document is held as a tree of [`Schema`] values. Object-shaped
//! schemas deserialize into [`SchemaNode`], which names the keywords the
//! pipeline reads or rewrites and keeps every other keyword in an ordered
//! `extra` map. Anything else (numbers, strings, objects with ill-typed
//! keywords) becomes a [`Schema::Leaf`] and passes through untouched.

use std::fmt;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::type_expr::TypeExpr;

/// One node of a schema tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Schema {
    /// An object-shaped schema.
    Node(Box<SchemaNode>),
    /// A value that is not a schema; carried verbatim.
    Leaf(Value),
}

impl Schema {
    /// Parse a schema from an already-parsed JSON value.
    ///
    /// Never fails: values that do not look like a schema become leaves.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or(Schema::Leaf(value))
    }

    /// Serialize back into a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Returns the node if this schema is object-shaped.
    pub fn as_node(&self) -> Option<&SchemaNode> {
        match self {
            Schema::Node(node) => Some(node),
            Schema::Leaf(_) => None,
        }
    }

    /// Mutable variant of [`Schema::as_node`].
    pub fn as_node_mut(&mut self) -> Option<&mut SchemaNode> {
        match self {
            Schema::Node(node) => Some(node),
            Schema::Leaf(_) => None,
        }
    }

    /// True if the schema has no own fields.
    ///
    /// Leaves other than non-empty objects count as empty: they carry no
    /// schema keywords.
    pub fn is_empty(&self) -> bool {
        match self {
            Schema::Node(node) => node.is_empty(),
            Schema::Leaf(Value::Object(map)) => map.is_empty(),
            Schema::Leaf(_) => true,
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Schema::Node(Box::default())
    }
}

impl From<SchemaNode> for Schema {
    fn from(node: SchemaNode) -> Self {
        Schema::Node(Box::new(node))
    }
}

/// An object-shaped schema with the keywords this crate cares about.
///
/// Deserialization never rejects an object: a known keyword whose value has
/// an unexpected JSON type is kept verbatim in `extra` and the field stays
/// unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaNode {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,

    /// A list of property names, or the draft-3 boolean form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Value>,

    #[serde(rename = "oneOf", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Schema>>,

    #[serde(rename = "anyOf", skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Schema>>,

    #[serde(rename = "allOf", skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<Value>,

    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<Value>,

    #[serde(rename = "$$ref", skip_serializing_if = "Option::is_none")]
    pub legacy_reference: Option<Value>,

    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Value>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(rename = "tsEnumNames", skip_serializing_if = "Option::is_none")]
    pub ts_enum_names: Option<Vec<String>>,

    /// Literal type expression attached by the reference encoder.
    #[serde(rename = "tsType", skip_serializing_if = "Option::is_none")]
    pub ts_type: Option<TypeExpr>,

    /// Non-standard marker, raw. See [`SchemaNode::is_any`].
    #[serde(rename = "__is_any__", skip_serializing_if = "Option::is_none")]
    pub any_marker: Option<Value>,

    /// Every keyword not held above, in document order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let keywords = Map::<String, Value>::deserialize(deserializer)?;
        let mut node = SchemaNode::default();
        for (key, value) in keywords {
            if let Err(value) = node.set_keyword(&key, value) {
                node.extra.insert(key, value);
            }
        }
        Ok(node)
    }
}

impl SchemaNode {
    /// Store one keyword in its field. Unknown keywords and ill-typed
    /// values are handed back for `extra`.
    fn set_keyword(&mut self, key: &str, value: Value) -> Result<(), Value> {
        match key {
            "type" => self.schema_type = Some(typed(key, value)?),
            "properties" => {
                self.properties = Some(match typed(key, value)? {
                    RawProperties::Map(map) => map,
                    RawProperties::Seq(items) => fold_named(items),
                })
            }
            "items" => self.items = Some(typed(key, value)?),
            "required" => self.required = Some(value),
            "oneOf" => self.one_of = Some(typed(key, value)?),
            "anyOf" => self.any_of = Some(typed(key, value)?),
            "allOf" => self.all_of = Some(typed(key, value)?),
            "title" => self.title = Some(typed(key, value)?),
            "description" => self.description = Some(typed(key, value)?),
            "default" => self.default = Some(value),
            "minItems" => self.min_items = Some(value),
            "maxItems" => self.max_items = Some(value),
            "id" => self.id = Some(value),
            "$ref" => self.reference = Some(value),
            "$$ref" => self.legacy_reference = Some(value),
            "additionalProperties" => self.additional_properties = Some(value),
            "enum" => self.enum_values = Some(typed(key, value)?),
            "tsEnumNames" => self.ts_enum_names = Some(typed(key, value)?),
            "__is_any__" => self.any_marker = Some(value),
            _ => return Err(value),
        }
        Ok(())
    }

    /// True if the `__is_any__` marker holds a truthy value.
    ///
    /// Truthiness follows JavaScript: `null`, `false`, `0` and `""` are
    /// false, everything else (including `[]` and `{}`) is true.
    pub fn is_any(&self) -> bool {
        match &self.any_marker {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }

    /// True if no keyword is set.
    pub fn is_empty(&self) -> bool {
        *self == SchemaNode::default()
    }

    /// True if `type` is exactly the single name given.
    pub fn is_type(&self, name: &str) -> bool {
        self.schema_type.as_ref().is_some_and(|t| t.is(name))
    }

    /// Property names listed in a `required` array.
    pub fn required_names(&self) -> Vec<&str> {
        match &self.required {
            Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// The `type` keyword: one name or a list of names.
///
/// Entries are kept as raw JSON so that non-string entries survive untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Multiple(Vec<Value>),
    Single(Value),
}

impl SchemaType {
    /// True if this is a single type with the given name.
    pub fn is(&self, name: &str) -> bool {
        matches!(self, SchemaType::Single(Value::String(s)) if s == name)
    }

    /// String entries, in order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            SchemaType::Single(value) => value.as_str().into_iter().collect(),
            SchemaType::Multiple(values) => values.iter().filter_map(Value::as_str).collect(),
        }
    }
}

impl From<&str> for SchemaType {
    fn from(name: &str) -> Self {
        SchemaType::Single(Value::String(name.to_string()))
    }
}

/// The `items` keyword: one item schema or a positional list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    Tuple(Vec<Schema>),
    Single(Schema),
}

impl Items {
    /// Item schemas as a sequence; a single schema is a sequence of one.
    pub fn as_slice(&self) -> &[Schema] {
        match self {
            Items::Tuple(items) => items,
            Items::Single(item) => std::slice::from_ref(item),
        }
    }

    /// Mutable variant of [`Items::as_slice`].
    pub fn as_mut_slice(&mut self) -> &mut [Schema] {
        match self {
            Items::Tuple(items) => items,
            Items::Single(item) => std::slice::from_mut(item),
        }
    }
}

/// `properties` either as a map or as a list of nodes carrying a `name`
/// keyword (emitted by Mock.js `toJSONSchema`).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawProperties {
    Map(IndexMap<String, Schema>),
    Seq(Vec<Schema>),
}

/// Decode a keyword value, handing it back unchanged if it has the wrong shape.
fn typed<T: DeserializeOwned>(key: &str, value: Value) -> Result<T, Value> {
    match T::deserialize(&value) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            tracing::debug!(keyword = key, error = %err, "keeping ill-typed keyword verbatim");
            Err(value)
        }
    }
}

fn fold_named(items: Vec<Schema>) -> IndexMap<String, Schema> {
    let mut props = IndexMap::with_capacity(items.len());
    for item in items {
        let name = item
            .as_node()
            .and_then(|node| node.extra.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);
        match name {
            Some(name) => {
                props.insert(name, item);
            }
            None => tracing::debug!("dropping unnamed entry from array-shaped properties"),
        }
    }
    props
}

/// One step of a traversal path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A property name.
    Key(String),
    /// An array position; always `0` for collapsed arrays.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// Location of a node relative to the root, as a list of segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The empty path.
    pub fn root() -> Self {
        Path(Vec::new())
    }

    /// A new path with one more segment.
    pub fn child(&self, segment: impl Into<Segment>) -> Path {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Path(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_parses_as_node() {
        let schema = Schema::from_value(json!({
            "type": "object",
            "properties": { "id": { "type": "string" } },
            "required": ["id"]
        }));
        let node = schema.as_node().unwrap();
        assert!(node.is_type("object"));
        assert_eq!(node.required_names(), vec!["id"]);
        assert!(node.properties.as_ref().unwrap().contains_key("id"));
    }

    #[test]
    fn non_object_is_leaf() {
        assert_eq!(Schema::from_value(json!(42)), Schema::Leaf(json!(42)));
        assert_eq!(Schema::from_value(json!("x")), Schema::Leaf(json!("x")));
    }

    #[test]
    fn ill_typed_keywords_stay_in_the_node() {
        let value = json!({
            "type": "object",
            "title": 7,
            "description": ["x"],
            "enum": "x",
            "tsEnumNames": [1],
            "oneOf": {},
            "properties": 5
        });
        let schema = Schema::from_value(value.clone());
        let node = schema.as_node().unwrap();
        assert!(node.is_type("object"));
        assert!(node.title.is_none());
        assert!(node.description.is_none());
        assert!(node.enum_values.is_none());
        assert!(node.ts_enum_names.is_none());
        assert!(node.one_of.is_none());
        assert!(node.properties.is_none());
        assert_eq!(node.extra["title"], json!(7));
        assert_eq!(schema.to_value(), value);
    }

    #[test]
    fn ill_typed_keyword_keeps_children_reachable() {
        let schema = Schema::from_value(json!({
            "description": 123,
            "properties": { "id": { "type": "Long", "title": false } }
        }));
        let child = &schema.as_node().unwrap().properties.as_ref().unwrap()["id"];
        assert!(child.as_node().unwrap().is_type("Long"));
    }

    #[test]
    fn any_marker_truthiness() {
        let marked = |marker: Value| {
            Schema::from_value(json!({ "__is_any__": marker }))
                .as_node()
                .unwrap()
                .is_any()
        };
        for truthy in [json!(true), json!(1), json!("yes"), json!([]), json!({})] {
            assert!(marked(truthy.clone()), "{}", truthy);
        }
        for falsy in [json!(false), json!(0), json!(0.0), json!(""), json!(null)] {
            assert!(!marked(falsy.clone()), "{}", falsy);
        }
        assert!(!SchemaNode::default().is_any());
    }

    #[test]
    fn array_properties_fold_into_map() {
        let schema = Schema::from_value(json!({
            "type": "object",
            "properties": [
                { "name": "a", "type": "string" },
                { "name": "b", "type": "number" },
                { "type": "boolean" }
            ]
        }));
        let props = schema.as_node().unwrap().properties.as_ref().unwrap();
        let keys: Vec<_> = props.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(props["b"].as_node().unwrap().is_type("number"));
    }

    #[test]
    fn unknown_keywords_round_trip() {
        let value = json!({
            "type": "string",
            "format": "date-time",
            "enum": ["a", "b"],
            "x-extra": { "nested": true }
        });
        let schema = Schema::from_value(value.clone());
        assert_eq!(schema.to_value(), value);
    }

    #[test]
    fn type_list_keeps_non_string_entries() {
        let schema = Schema::from_value(json!({ "type": ["String", 3] }));
        let node = schema.as_node().unwrap();
        assert_eq!(
            node.schema_type,
            Some(SchemaType::Multiple(vec![json!("String"), json!(3)]))
        );
        assert_eq!(node.schema_type.as_ref().unwrap().names(), vec!["String"]);
    }

    #[test]
    fn empty_detection() {
        assert!(Schema::from_value(json!({})).is_empty());
        assert!(Schema::from_value(json!(null)).is_empty());
        assert!(!Schema::from_value(json!({ "type": "string" })).is_empty());
        assert!(!Schema::from_value(json!({ "x-vendor": 1 })).is_empty());
    }

    #[test]
    fn path_display_and_child() {
        let root = Path::root();
        let path = root.child("a").child(0).child("b");
        assert!(root.is_root());
        assert_eq!(path.to_string(), "a/0/b");
        assert_eq!(path.segments().len(), 3);
    }
}
