//! End-to-end generation: raw schema in, TypeScript declaration out.

use serde_json::Value;

use crate::compiler::TypeScriptCompiler;
use crate::error::{CompileError, GenerateError, LoadError};
use crate::loader::load_schema_str;
use crate::naming::{is_valid_type_name, to_pascal_case};
use crate::normalize::{normalize, TypeMapping};
use crate::schema::Schema;
use crate::synthesize::synthesize;
use crate::types::{BodyKind, InterfaceData};

/// Base type name used when an interface path yields no usable words.
const FALLBACK_BASE_NAME: &str = "Api";

/// Normalizes and compiles schemas with a fixed type mapping.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    mapping: TypeMapping,
    compiler: TypeScriptCompiler,
}

/// Declarations generated for one interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceTypes {
    pub request: Option<String>,
    pub response: Option<String>,
}

impl InterfaceTypes {
    /// All declarations, separated by a blank line.
    pub fn to_source(&self) -> String {
        [&self.request, &self.response]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `mapping` instead of the built-in type table.
    pub fn with_mapping(mut self, mapping: TypeMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn mapping(&self) -> &TypeMapping {
        &self.mapping
    }

    /// Normalize a parsed schema document.
    pub fn normalize(&self, schema: Value) -> Schema {
        normalize(Schema::from_value(schema), &self.mapping)
    }

    /// Normalize and compile a parsed schema document.
    pub fn generate(&self, schema: Value, type_name: &str) -> Result<String, GenerateError> {
        self.generate_schema(Schema::from_value(schema), type_name)
    }

    /// Parse, normalize and compile raw schema text.
    pub fn generate_str(&self, text: &str, type_name: &str) -> Result<String, GenerateError> {
        self.generate_schema(load_schema_str(text)?, type_name)
    }

    /// Normalize and compile a schema tree.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::InvalidTypeName` if `type_name` cannot name a
    /// TypeScript type. The compiler only ever sees the placeholder name, so
    /// the check happens here.
    pub fn generate_schema(&self, schema: Schema, type_name: &str) -> Result<String, GenerateError> {
        if !is_valid_type_name(type_name) {
            return Err(CompileError::InvalidTypeName {
                name: type_name.to_string(),
            }
            .into());
        }
        let normalized = normalize(schema, &self.mapping);
        Ok(synthesize(&normalized, type_name, &self.compiler)?)
    }

    /// Generate the request and response declarations of one interface.
    ///
    /// Names are `<Base>Request` / `<Base>Response`, where `<Base>` is the
    /// PascalCase form of the interface path unless `base_name` is given.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::MissingBody` if neither body holds a schema.
    pub fn generate_interface(
        &self,
        data: &InterfaceData,
        base_name: Option<&str>,
    ) -> Result<InterfaceTypes, GenerateError> {
        let base = match base_name {
            Some(name) => name.to_string(),
            None => match to_pascal_case(&data.path) {
                name if name.is_empty() => FALLBACK_BASE_NAME.to_string(),
                name => name,
            },
        };

        let mut types = InterfaceTypes::default();
        for kind in [BodyKind::Request, BodyKind::Response] {
            let Some(text) = data.body(kind) else {
                tracing::debug!(path = %data.path, body = kind.as_str(), "no schema body");
                continue;
            };
            let type_name = format!("{}{}", base, kind.type_suffix());
            let declaration = self.generate_str(text, &type_name)?;
            match kind {
                BodyKind::Request => types.request = Some(declaration),
                BodyKind::Response => types.response = Some(declaration),
            }
        }

        if types.request.is_none() && types.response.is_none() {
            return Err(LoadError::MissingBody {
                part: "request or response".to_string(),
            }
            .into());
        }
        Ok(types)
    }
}
