//! Preparing a normalized schema for the type compiler.
//!
//! The compiler derives names, doc comments and literal types from several
//! keywords that carry no structural meaning for us. This pass removes them,
//! closes every object and turns `&path` title directives into literal
//! indexed type expressions.

use serde_json::Value;

use crate::schema::{Path, Schema, SchemaNode};
use crate::type_expr::TypeExpr;
use crate::walker::{walk, Visitor};

/// Encode `schema` for compilation under the root type `root_name`.
///
/// Destructive: pass a copy if the input is still needed.
pub fn encode(mut schema: Schema, root_name: &str) -> Schema {
    // The root description would otherwise become a doc comment on the whole type.
    if let Some(root) = schema.as_node_mut() {
        root.description = None;
        root.extra.remove("description");
    }
    walk(schema, &mut ReferenceEncoder::new(root_name))
}

/// Per-node encoding pass.
pub struct ReferenceEncoder<'a> {
    root_name: &'a str,
}

impl<'a> ReferenceEncoder<'a> {
    pub fn new(root_name: &'a str) -> Self {
        Self { root_name }
    }
}

impl Visitor for ReferenceEncoder<'_> {
    fn visit(&mut self, node: &mut SchemaNode, path: &Path) {
        // Older platform versions have no title field, so the directive may
        // live in the description instead. A non-null title of any type wins.
        let directive = match (&node.title, node.extra.get("title")) {
            (Some(title), _) => Some(title.as_str()),
            (None, Some(raw)) if !raw.is_null() => None,
            _ => node.description.as_deref(),
        };
        if let Some(expr) =
            directive.and_then(|text| TypeExpr::from_directive(self.root_name, path, text))
        {
            tracing::debug!(path = %path, expr = %expr, "encoded type alias directive");
            node.extra.remove("tsType");
            node.ts_type = Some(expr);
        }

        node.title = None;
        node.extra.remove("title");
        node.id = None;

        node.min_items = None;
        node.max_items = None;

        if node.is_type("object") {
            node.additional_properties = Some(Value::Bool(false));
        }

        node.default = None;
    }
}
