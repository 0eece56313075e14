//! Indexed type expressions.
//!
//! A `&` directive in a node's title points at another location inside the
//! root type. It is encoded as a chain of indexed accesses, each wrapped in
//! `NonNullable` so that optional parents do not leak `undefined`. Every
//! segment, array positions included, is indexed with a string literal:
//!
//! ```text
//! /a/b against Foo     =>  NonNullable<NonNullable<Foo["a"]>["b"]>
//! /list/0 against Foo  =>  NonNullable<NonNullable<Foo["list"]>["0"]>
//! ```

use std::fmt;

use serde::{Serialize, Serializer};

use crate::schema::{Path, Segment};

/// Sigil marking a title or description as a type alias directive.
pub const DIRECTIVE_SIGIL: char = '&';

/// A root type name followed by indexed accesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    root: String,
    segments: Vec<Segment>,
}

impl TypeExpr {
    /// The bare root type.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            segments: Vec::new(),
        }
    }

    /// Append one indexed access.
    pub fn index(mut self, segment: impl Into<Segment>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Build the expression for a directive found at `path`.
    ///
    /// Returns `None` unless `directive` starts with [`DIRECTIVE_SIGIL`]. The
    /// text after the sigil is appended to the traversal path and the result
    /// is cleaned up: backslashes count as separators, empty and `.`
    /// segments vanish and `..` pops the previous segment. Other segments
    /// are kept verbatim, colons and digits included.
    pub fn from_directive(root: &str, path: &Path, directive: &str) -> Option<Self> {
        let relative = directive.strip_prefix(DIRECTIVE_SIGIL)?;
        let relative = relative.replace('\\', "/");

        let mut segments: Vec<Segment> = path.segments().to_vec();
        for part in relative.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                _ => segments.push(Segment::from(part)),
            }
        }

        Some(Self {
            root: root.to_string(),
            segments,
        })
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in &self.segments {
            f.write_str("NonNullable<")?;
        }
        f.write_str(&self.root)?;
        for segment in &self.segments {
            write!(f, "[{}]>", quote(&segment.to_string()))?;
        }
        Ok(())
    }
}

impl Serialize for TypeExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Render a string as a double-quoted literal.
fn quote(key: &str) -> String {
    serde_json::to_string(key).unwrap_or_else(|_| format!("\"{}\"", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(keys: &[&str]) -> Path {
        keys.iter().map(|k| Segment::from(*k)).collect()
    }

    #[test]
    fn bare_root() {
        assert_eq!(TypeExpr::new("Foo").to_string(), "Foo");
    }

    #[test]
    fn nesting_order() {
        let expr = TypeExpr::new("Foo").index("a").index("b");
        assert_eq!(expr.to_string(), r#"NonNullable<NonNullable<Foo["a"]>["b"]>"#);
    }

    #[test]
    fn index_segments_are_quoted() {
        let expr = TypeExpr::new("Foo").index("list").index(0);
        assert_eq!(expr.to_string(), r#"NonNullable<NonNullable<Foo["list"]>["0"]>"#);
    }

    #[test]
    fn keys_are_escaped() {
        let expr = TypeExpr::new("Foo").index(r#"we"ird"#);
        assert_eq!(expr.to_string(), r#"NonNullable<Foo["we\"ird"]>"#);
    }

    #[test]
    fn directive_appends_to_path() {
        let expr = TypeExpr::from_directive("Foo", &path(&["a", "b"]), "&c").unwrap();
        assert_eq!(
            expr.to_string(),
            r#"NonNullable<NonNullable<NonNullable<Foo["a"]>["b"]>["c"]>"#
        );
    }

    #[test]
    fn directive_requires_sigil() {
        assert!(TypeExpr::from_directive("Foo", &Path::root(), "plain title").is_none());
        assert!(TypeExpr::from_directive("Foo", &Path::root(), "").is_none());
    }

    #[test]
    fn directive_collapses_slashes_and_backslashes() {
        let expr = TypeExpr::from_directive("Foo", &path(&["a"]), "&//b\\\\c/").unwrap();
        assert_eq!(expr.segments(), &[Segment::from("a"), "b".into(), "c".into()]);
    }

    #[test]
    fn directive_keeps_colons_in_keys() {
        let expr = TypeExpr::from_directive("Foo", &path(&["t"]), "&time:start").unwrap();
        assert_eq!(
            expr.to_string(),
            r#"NonNullable<NonNullable<Foo["t"]>["time:start"]>"#
        );

        let expr = TypeExpr::from_directive("Foo", &Path::root(), "&http:/x").unwrap();
        assert_eq!(expr.segments(), &[Segment::from("http:"), "x".into()]);
    }

    #[test]
    fn directive_resolves_dot_segments() {
        let expr = TypeExpr::from_directive("Foo", &path(&["a", "b"]), "&../c/./d").unwrap();
        assert_eq!(expr.segments(), &[Segment::from("a"), "c".into(), "d".into()]);

        let expr = TypeExpr::from_directive("Foo", &Path::root(), "&../../x").unwrap();
        assert_eq!(expr.segments(), &[Segment::from("x")]);
    }

    #[test]
    fn directive_numeric_segments_are_quoted_keys() {
        let expr = TypeExpr::from_directive("Foo", &path(&["list"]), "&0/id").unwrap();
        assert_eq!(expr.segments()[1], Segment::from("0"));
        assert_eq!(
            expr.to_string(),
            r#"NonNullable<NonNullable<NonNullable<Foo["list"]>["0"]>["id"]>"#
        );
    }

    #[test]
    fn traversal_index_renders_like_key() {
        let walked: Path = [Segment::from("list"), Segment::from(0)].into_iter().collect();
        let expr = TypeExpr::from_directive("Foo", &walked, "&").unwrap();
        assert_eq!(expr.to_string(), r#"NonNullable<NonNullable<Foo["list"]>["0"]>"#);
    }

    #[test]
    fn empty_directive_points_at_current_node() {
        let expr = TypeExpr::from_directive("Foo", &path(&["a"]), "&").unwrap();
        assert_eq!(expr.to_string(), r#"NonNullable<Foo["a"]>"#);
    }

    #[test]
    fn serializes_as_string() {
        let expr = TypeExpr::new("Foo").index("a");
        assert_eq!(
            serde_json::to_value(&expr).unwrap(),
            serde_json::json!(r#"NonNullable<Foo["a"]>"#)
        );
    }
}
