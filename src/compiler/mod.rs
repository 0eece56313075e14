//! Schema-to-source compilation.
//!
//! The synthesis front-end only depends on the [`Compiler`] trait; the crate
//! ships [`TypeScriptCompiler`] as the default implementation.

mod typescript;

pub use typescript::TypeScriptCompiler;

use crate::schema::Schema;

/// Settings handed to a compiler along with the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Comment placed above the generated source; empty for none.
    pub banner_comment: String,
    /// Emit declarations for named types referenced from the root.
    pub declare_externally_referenced: bool,
    /// Emit named enumerations as `const enum`.
    pub enable_const_enums: bool,
    /// Add `| undefined` to index signatures.
    pub strict_index_signatures: bool,
    /// Lay declarations out with blank lines and a trailing newline.
    pub format: bool,
}

impl CompileOptions {
    /// The fixed settings used by [`synthesize`](crate::synthesize).
    pub fn synthesis() -> Self {
        Self {
            banner_comment: String::new(),
            declare_externally_referenced: true,
            enable_const_enums: true,
            strict_index_signatures: false,
            format: false,
        }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::synthesis()
    }
}

/// Turns a schema tree into source text declaring `root_name`.
pub trait Compiler {
    type Error;

    fn compile(
        &self,
        schema: &Schema,
        root_name: &str,
        options: &CompileOptions,
    ) -> Result<String, Self::Error>;
}

impl<C: Compiler + ?Sized> Compiler for &C {
    type Error = C::Error;

    fn compile(
        &self,
        schema: &Schema,
        root_name: &str,
        options: &CompileOptions,
    ) -> Result<String, Self::Error> {
        (**self).compile(schema, root_name, options)
    }
}
