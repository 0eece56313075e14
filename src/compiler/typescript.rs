//! Built-in JSON Schema to TypeScript compiler.
//!
//! Lowers a schema tree into a small TypeScript type AST and prints it.
//! Object roots become interfaces; every other root becomes a type alias.
//! Named enumerations (`enum` + `tsEnumNames`) are the only additional
//! declarations this compiler produces.

use std::collections::HashSet;

use serde_json::Value;

use super::{CompileOptions, Compiler};
use crate::error::CompileError;
use crate::naming::{is_valid_type_name, quote_if_needed, to_pascal_case};
use crate::schema::{Items, Schema, SchemaNode, SchemaType};

/// Compiles schemas to TypeScript declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptCompiler;

impl Compiler for TypeScriptCompiler {
    type Error = CompileError;

    fn compile(
        &self,
        schema: &Schema,
        root_name: &str,
        options: &CompileOptions,
    ) -> Result<String, CompileError> {
        if !is_valid_type_name(root_name) {
            return Err(CompileError::InvalidTypeName {
                name: root_name.to_string(),
            });
        }

        let mut lowering = Lowering::new(options, root_name);
        let root = lowering.lower(schema, root_name);
        let doc = schema.as_node().and_then(|node| node.description.as_deref());

        let mut blocks = Vec::new();
        if !options.banner_comment.is_empty() {
            blocks.push(options.banner_comment.clone());
        }
        blocks.push(declare_root(root_name, &root, doc));
        if options.declare_externally_referenced {
            blocks.extend(lowering.declarations);
        }

        let source = if options.format {
            let mut joined = blocks.join("\n\n");
            joined.push('\n');
            joined
        } else {
            blocks.join("\n")
        };
        Ok(source)
    }
}

// =============================================================================
// Type AST
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TsType {
    Any,
    Unknown,
    String,
    Number,
    Boolean,
    Null,
    Literal(Value),
    /// Type expression emitted verbatim.
    Raw(String),
    Array(Box<TsType>),
    Tuple(Vec<TsType>),
    Union(Vec<TsType>),
    Intersection(Vec<TsType>),
    Object(TsObject),
}

#[derive(Debug, Clone, PartialEq)]
struct TsObject {
    props: Vec<TsProp>,
    /// Value type of `[k: string]: ...`; `None` for closed objects.
    index: Option<Box<TsType>>,
}

#[derive(Debug, Clone, PartialEq)]
struct TsProp {
    name: String,
    ty: TsType,
    optional: bool,
    doc: Option<String>,
}

// =============================================================================
// Lowering
// =============================================================================

struct Lowering<'a> {
    options: &'a CompileOptions,
    declarations: Vec<String>,
    names: HashSet<String>,
}

impl<'a> Lowering<'a> {
    fn new(options: &'a CompileOptions, root_name: &str) -> Self {
        Self {
            options,
            declarations: Vec::new(),
            names: HashSet::from([root_name.to_string()]),
        }
    }

    /// Lower one schema; `hint` names any enum declared for it.
    fn lower(&mut self, schema: &Schema, hint: &str) -> TsType {
        let node = match schema {
            Schema::Node(node) => node,
            Schema::Leaf(_) => return TsType::Unknown,
        };

        if node.is_any() {
            return TsType::Any;
        }
        if let Some(expr) = &node.ts_type {
            return TsType::Raw(expr.to_string());
        }
        if let Some(raw) = node.extra.get("tsType").and_then(Value::as_str) {
            return TsType::Raw(raw.to_string());
        }
        if let Some(values) = &node.enum_values {
            return self.lower_enum(node, values, hint);
        }

        let mut parts = Vec::new();
        if let Some(structural) = self.lower_structure(node, hint) {
            parts.push(structural);
        }
        for alternatives in [&node.one_of, &node.any_of].into_iter().flatten() {
            parts.push(union(
                alternatives.iter().map(|alt| self.lower(alt, hint)).collect(),
            ));
        }
        if let Some(components) = &node.all_of {
            parts.push(intersection(
                components.iter().map(|c| self.lower(c, hint)).collect(),
            ));
        }

        match parts.len() {
            0 => TsType::Unknown,
            1 => parts.remove(0),
            _ => intersection(parts),
        }
    }

    /// The part of a node described by `type`, `properties` and `items`.
    fn lower_structure(&mut self, node: &SchemaNode, hint: &str) -> Option<TsType> {
        match &node.schema_type {
            Some(SchemaType::Single(value)) => Some(self.lower_type_name(node, value, hint)),
            Some(SchemaType::Multiple(values)) => Some(union(
                values
                    .iter()
                    .map(|value| self.lower_type_name(node, value, hint))
                    .collect(),
            )),
            None if node.properties.is_some() => Some(self.lower_object(node, hint)),
            None if node.items.is_some() => Some(self.lower_array(node, hint)),
            None => None,
        }
    }

    fn lower_type_name(&mut self, node: &SchemaNode, value: &Value, hint: &str) -> TsType {
        match value.as_str() {
            Some("string") => TsType::String,
            Some("number") | Some("integer") => TsType::Number,
            Some("boolean") => TsType::Boolean,
            Some("null") => TsType::Null,
            Some("any") => TsType::Any,
            Some("array") => self.lower_array(node, hint),
            Some("object") => self.lower_object(node, hint),
            _ => TsType::Unknown,
        }
    }

    fn lower_array(&mut self, node: &SchemaNode, hint: &str) -> TsType {
        match &node.items {
            Some(Items::Single(item)) => TsType::Array(Box::new(self.lower(item, hint))),
            Some(Items::Tuple(items)) if !items.is_empty() => {
                TsType::Tuple(items.iter().map(|item| self.lower(item, hint)).collect())
            }
            _ => TsType::Array(Box::new(TsType::Unknown)),
        }
    }

    fn lower_object(&mut self, node: &SchemaNode, hint: &str) -> TsType {
        let required = node.required_names();
        let mut props = Vec::new();

        for (name, child) in node.properties.iter().flatten() {
            let child_node = child.as_node();
            let child_hint = match to_pascal_case(name) {
                h if h.is_empty() => format!("{}Enum", hint),
                h => h,
            };
            let draft3_required = child_node.is_some_and(|n| n.required == Some(Value::Bool(true)));
            props.push(TsProp {
                name: name.clone(),
                ty: self.lower(child, &child_hint),
                optional: !(required.contains(&name.as_str()) || draft3_required),
                doc: child_node.and_then(|n| n.description.clone()),
            });
        }

        let index = match &node.additional_properties {
            Some(Value::Bool(false)) => None,
            Some(schema @ Value::Object(_)) => {
                let value_schema = Schema::from_value(schema.clone());
                Some(self.lower(&value_schema, hint))
            }
            _ => Some(TsType::Unknown),
        };
        let index = index.map(|ty| {
            if self.options.strict_index_signatures {
                Box::new(union(vec![ty, TsType::Raw("undefined".to_string())]))
            } else {
                Box::new(ty)
            }
        });

        TsType::Object(TsObject { props, index })
    }

    fn lower_enum(&mut self, node: &SchemaNode, values: &[Value], hint: &str) -> TsType {
        let literals: Vec<TsType> = values
            .iter()
            .map(|value| match value {
                Value::Object(_) | Value::Array(_) => TsType::Unknown,
                other => TsType::Literal(other.clone()),
            })
            .collect();

        match &node.ts_enum_names {
            Some(member_names)
                if member_names.len() == values.len()
                    && values.iter().all(|v| v.is_string() || v.is_number()) =>
            {
                let name = self.reserve_name(hint);
                self.declarations
                    .push(declare_enum(&name, member_names, values, self.options));
                TsType::Raw(name)
            }
            _ => union(literals),
        }
    }

    /// A type name derived from `hint` that is not taken yet.
    fn reserve_name(&mut self, hint: &str) -> String {
        let base = if is_valid_type_name(hint) {
            hint.to_string()
        } else {
            format!("Enum{}", hint)
        };
        let mut name = base.clone();
        let mut counter = 1;
        while self.names.contains(&name) {
            name = format!("{}{}", base, counter);
            counter += 1;
        }
        self.names.insert(name.clone());
        name
    }
}

fn union(mut types: Vec<TsType>) -> TsType {
    if types.len() == 1 {
        types.remove(0)
    } else {
        TsType::Union(types)
    }
}

fn intersection(mut types: Vec<TsType>) -> TsType {
    if types.len() == 1 {
        types.remove(0)
    } else {
        TsType::Intersection(types)
    }
}

// =============================================================================
// Printing
// =============================================================================

fn declare_root(name: &str, ty: &TsType, doc: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(doc) = doc {
        out.push_str(&doc_comment(doc, 0));
    }
    match ty {
        TsType::Object(object) => {
            out.push_str(&format!("export interface {} {}", name, emit_object(object, 0)));
        }
        other => out.push_str(&format!("export type {} = {};", name, emit(other, 0))),
    }
    out
}

fn declare_enum(
    name: &str,
    members: &[String],
    values: &[Value],
    options: &CompileOptions,
) -> String {
    let keyword = if options.enable_const_enums {
        "const enum"
    } else {
        "enum"
    };
    let mut out = format!("export {} {} {{\n", keyword, name);
    for (member, value) in members.iter().zip(values) {
        out.push_str(&format!(
            "  {} = {},\n",
            quote_if_needed(member),
            emit_literal(value)
        ));
    }
    out.push('}');
    out
}

fn emit(ty: &TsType, depth: usize) -> String {
    match ty {
        TsType::Any => "any".to_string(),
        TsType::Unknown => "unknown".to_string(),
        TsType::String => "string".to_string(),
        TsType::Number => "number".to_string(),
        TsType::Boolean => "boolean".to_string(),
        TsType::Null => "null".to_string(),
        TsType::Literal(value) => emit_literal(value),
        TsType::Raw(text) => text.clone(),
        TsType::Array(inner) => {
            let inner_str = emit(inner, depth);
            // Wrap complex types in parentheses
            if matches!(**inner, TsType::Union(_) | TsType::Intersection(_)) {
                format!("({})[]", inner_str)
            } else {
                format!("{}[]", inner_str)
            }
        }
        TsType::Tuple(items) => format!(
            "[{}]",
            items
                .iter()
                .map(|t| emit(t, depth))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        TsType::Union(types) => types
            .iter()
            .map(|t| emit(t, depth))
            .collect::<Vec<_>>()
            .join(" | "),
        TsType::Intersection(types) => types
            .iter()
            .map(|t| {
                let s = emit(t, depth);
                if matches!(t, TsType::Union(_)) {
                    format!("({})", s)
                } else {
                    s
                }
            })
            .collect::<Vec<_>>()
            .join(" & "),
        TsType::Object(object) => emit_object(object, depth),
    }
}

fn emit_object(object: &TsObject, depth: usize) -> String {
    if object.props.is_empty() && object.index.is_none() {
        return "{}".to_string();
    }

    let indent = "  ".repeat(depth + 1);
    let mut out = String::from("{\n");
    for prop in &object.props {
        if let Some(doc) = &prop.doc {
            out.push_str(&doc_comment(doc, depth + 1));
        }
        let opt = if prop.optional { "?" } else { "" };
        out.push_str(&format!(
            "{}{}{}: {};\n",
            indent,
            quote_if_needed(&prop.name),
            opt,
            emit(&prop.ty, depth + 1)
        ));
    }
    if let Some(index) = &object.index {
        out.push_str(&format!("{}[k: string]: {};\n", indent, emit(index, depth + 1)));
    }
    out.push_str(&"  ".repeat(depth));
    out.push('}');
    out
}

fn emit_literal(value: &Value) -> String {
    match value {
        Value::String(s) => serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s)),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => "unknown".to_string(),
    }
}

fn doc_comment(text: &str, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let mut out = format!("{}/**\n", indent);
    for line in text.lines() {
        let line = line.replace("*/", "*\\/");
        if line.trim().is_empty() {
            out.push_str(&format!("{} *\n", indent));
        } else {
            out.push_str(&format!("{} * {}\n", indent, line.trim_end()));
        }
    }
    out.push_str(&format!("{} */\n", indent));
    out
}
