//! Type synthesis front-end.

use crate::compiler::{CompileOptions, Compiler};
use crate::encode::encode;
use crate::schema::{Schema, SchemaNode};

/// Root name handed to the compiler and replaced afterwards.
///
/// All upper case so that compilers which re-case type names leave it intact.
pub const PLACEHOLDER_TYPE_NAME: &str = "THISISAFAKETYPENAME";

/// Produce a declaration named `type_name` for a normalized schema.
///
/// - an empty schema yields `export interface <Name> {}`
/// - a schema with a truthy `__is_any__` yields `export type <Name> = any`
/// - anything else is encoded (on a private copy) and compiled
///
/// Compiler errors are returned unchanged.
pub fn synthesize<C: Compiler>(
    schema: &Schema,
    type_name: &str,
    compiler: &C,
) -> Result<String, C::Error> {
    if schema.is_empty() {
        tracing::debug!(type_name, "empty schema, emitting empty interface");
        return Ok(format!("export interface {} {{}}", type_name));
    }
    if schema.as_node().is_some_and(SchemaNode::is_any) {
        tracing::debug!(type_name, "schema marked as any");
        return Ok(format!("export type {} = any", type_name));
    }

    let encoded = encode(schema.clone(), type_name);
    let code = compiler.compile(&encoded, PLACEHOLDER_TYPE_NAME, &CompileOptions::synthesis())?;
    Ok(code.replace(PLACEHOLDER_TYPE_NAME, type_name).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::TypeScriptCompiler;
    use crate::error::CompileError;
    use serde_json::json;

    /// Records what it was asked to compile.
    struct Echo;

    impl Compiler for Echo {
        type Error = String;

        fn compile(
            &self,
            schema: &Schema,
            root_name: &str,
            options: &CompileOptions,
        ) -> Result<String, String> {
            assert_eq!(options, &CompileOptions::synthesis());
            Ok(format!(
                "  {} {} {}  ",
                root_name,
                root_name,
                schema.to_value()
            ))
        }
    }

    struct Failing;

    impl Compiler for Failing {
        type Error = String;

        fn compile(&self, _: &Schema, _: &str, _: &CompileOptions) -> Result<String, String> {
            Err("compiler exploded".to_string())
        }
    }

    #[test]
    fn empty_schema_is_empty_interface() {
        let out = synthesize(&Schema::from_value(json!({})), "Widget", &Failing).unwrap();
        assert_eq!(out, "export interface Widget {}");
    }

    #[test]
    fn any_marker_is_any_alias() {
        let schema = Schema::from_value(json!({ "__is_any__": true, "type": "object" }));
        let out = synthesize(&schema, "Widget", &Failing).unwrap();
        assert_eq!(out, "export type Widget = any");
        assert!(!out.contains("__is_any__"));
    }

    #[test]
    fn truthy_any_marker_is_any_alias() {
        for marker in [json!(1), json!("1")] {
            let schema = Schema::from_value(json!({ "__is_any__": marker }));
            let out = synthesize(&schema, "Widget", &Failing).unwrap();
            assert_eq!(out, "export type Widget = any");
        }
    }

    #[test]
    fn false_any_marker_is_compiled() {
        let schema = Schema::from_value(json!({ "__is_any__": false, "type": "string" }));
        assert!(synthesize(&schema, "Widget", &Failing).is_err());
    }

    #[test]
    fn replaces_every_placeholder_and_trims() {
        let schema = Schema::from_value(json!({ "type": "string", "title": "T" }));
        let out = synthesize(&schema, "Widget", &Echo).unwrap();
        assert_eq!(out, r#"Widget Widget {"type":"string"}"#);
    }

    #[test]
    fn input_is_not_modified() {
        let schema = Schema::from_value(json!({ "type": "object", "description": "root", "title": "&x" }));
        let before = schema.clone();
        synthesize(&schema, "Widget", &Echo).unwrap();
        assert_eq!(schema, before);
    }

    #[test]
    fn compiler_errors_propagate_unchanged() {
        let schema = Schema::from_value(json!({ "type": "string" }));
        assert_eq!(
            synthesize(&schema, "Widget", &Failing).unwrap_err(),
            "compiler exploded"
        );
    }

    #[test]
    fn compiles_with_builtin_compiler() {
        let schema = Schema::from_value(json!({
            "type": "object",
            "description": "dropped",
            "properties": {
                "id": { "type": "integer", "default": 1 },
                "parent": { "type": "object", "title": "&../self" }
            },
            "required": ["id"]
        }));
        let out = synthesize(&schema, "Widget", &TypeScriptCompiler).unwrap();
        assert_eq!(
            out,
            "export interface Widget {\n  id: number;\n  parent?: NonNullable<Widget[\"self\"]>;\n}"
        );
    }

    #[test]
    fn scalar_root_becomes_alias() {
        let schema = Schema::from_value(json!({ "type": "string" }));
        let result: Result<String, CompileError> = synthesize(&schema, "Widget", &TypeScriptCompiler);
        assert_eq!(result.unwrap(), "export type Widget = string;");
    }
}
