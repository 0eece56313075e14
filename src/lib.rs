//! YApi TypeScript Generator
//!
//! Turns the JSON Schema documents an API documentation platform (YApi)
//! stores for request and response bodies into TypeScript declarations.
//!
//! The pipeline is:
//! 1. Load: raw schema text -> [`Schema`] tree
//! 2. Normalize: platform type names -> JSON Schema type names ([`normalize`])
//! 3. Encode: `&path` alias directives -> indexed type expressions ([`encode`])
//! 4. Compile: schema tree -> declaration text ([`Compiler`])
//!
//! Steps 3 and 4 are driven by [`synthesize`]; [`Generator`] runs all four.
//!
//! # Example
//!
//! ```
//! use yapi_typegen::Generator;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {
//!         "id": { "type": "Long" },
//!         "parentId": { "type": "Long", "title": "&../id" }
//!     },
//!     "required": ["id"]
//! });
//!
//! let ts = Generator::new().generate(schema, "User").unwrap();
//! assert_eq!(
//!     ts,
//!     "export interface User {\n  id: number;\n  parentId?: NonNullable<User[\"id\"]>;\n}"
//! );
//! ```
//!
//! # Alias Directives
//!
//! A `title` (or, when there is no title, a `description`) starting with `&`
//! declares the node's type as the type found at a path inside the root
//! type. The path after the sigil is appended to the node's own location:
//!
//! | Node location | Directive | Emitted type |
//! |---------------|-----------|--------------|
//! | `/a/b` | `&c` | `NonNullable<NonNullable<NonNullable<Root["a"]>["b"]>["c"]>` |
//! | `/a/b` | `&../c` | `NonNullable<NonNullable<Root["a"]>["c"]>` |
//! | `/list/0` | `&../../id` | `NonNullable<Root["id"]>` |

mod compiler;
mod encode;
mod error;
mod generator;
mod loader;
mod naming;
mod normalize;
mod schema;
mod synthesize;
mod type_expr;
mod types;
mod walker;

pub use compiler::{CompileOptions, Compiler, TypeScriptCompiler};
pub use encode::{encode, ReferenceEncoder};
pub use error::{CompileError, GenerateError, LoadError};
pub use generator::{Generator, InterfaceTypes};
pub use loader::{
    interface_id_from_url, is_url, load_interface, load_interface_str, load_schema,
    load_schema_str, sanitize_schema_text, url_origin, INTERFACE_ENDPOINT,
};
pub use naming::{is_identifier_name, is_valid_type_name, quote_if_needed, to_pascal_case};
pub use normalize::{normalize, Normalizer, TypeMapping};
pub use schema::{Items, Path, Schema, SchemaNode, SchemaType, Segment};
pub use synthesize::{synthesize, PLACEHOLDER_TYPE_NAME};
pub use type_expr::{TypeExpr, DIRECTIVE_SIGIL};
pub use types::{BodyKind, InterfaceData, InterfaceResponse, DEFAULT_FAILURE_MESSAGE};
pub use walker::{walk, walk_from, Visitor};

#[cfg(feature = "remote")]
pub use loader::{load_interface_auto, load_interface_url};
