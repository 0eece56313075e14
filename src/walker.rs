//! Pre-order traversal of a schema tree.
//!
//! The walker owns no policy: it hands every object-shaped node to a
//! [`Visitor`] together with the node's [`Path`], then descends into
//! `properties`, `items`, `oneOf`, `anyOf` and `allOf`.
//!
//! Path rules:
//! - `properties/<key>` appends `<key>`
//! - `items[i]` appends `i`
//! - `oneOf`/`anyOf`/`allOf` members keep the parent's path, since they are
//!   alternative shapes for the same position

use crate::schema::{Path, Schema, SchemaNode};

/// Callback invoked once per node, before its children.
pub trait Visitor {
    fn visit(&mut self, node: &mut SchemaNode, path: &Path);
}

impl<F> Visitor for F
where
    F: FnMut(&mut SchemaNode, &Path),
{
    fn visit(&mut self, node: &mut SchemaNode, path: &Path) {
        self(node, path)
    }
}

/// Walk `schema` from the root, returning the visited tree.
///
/// The tree is taken by value: callers that still need the original must
/// clone it first.
pub fn walk<V: Visitor + ?Sized>(schema: Schema, visitor: &mut V) -> Schema {
    walk_from(schema, visitor, &Path::root())
}

/// Walk `schema` as if it were located at `path`.
pub fn walk_from<V: Visitor + ?Sized>(mut schema: Schema, visitor: &mut V, path: &Path) -> Schema {
    walk_in_place(&mut schema, visitor, path);
    schema
}

fn walk_in_place<V: Visitor + ?Sized>(schema: &mut Schema, visitor: &mut V, path: &Path) {
    // Leaves are not schemas; leave them alone.
    let Schema::Node(node) = schema else {
        return;
    };
    let node = node.as_mut();

    tracing::trace!(path = %path, "visiting schema node");
    visitor.visit(node, path);

    if let Some(properties) = node.properties.as_mut() {
        for (key, child) in properties.iter_mut() {
            walk_in_place(child, visitor, &path.child(key.as_str()));
        }
    }

    if let Some(items) = node.items.as_mut() {
        for (index, child) in items.as_mut_slice().iter_mut().enumerate() {
            walk_in_place(child, visitor, &path.child(index));
        }
    }

    for alternatives in [
        node.one_of.as_mut(),
        node.any_of.as_mut(),
        node.all_of.as_mut(),
    ]
    .into_iter()
    .flatten()
    {
        for child in alternatives.iter_mut() {
            walk_in_place(child, visitor, path);
        }
    }
}
