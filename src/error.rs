//! Error types for schema loading and type generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while obtaining a schema or an interface description.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot load {input}: {message}")]
    InvalidSource { input: String, message: String },

    #[error("interface has no {part} schema")]
    MissingBody { part: String },

    // Reported by the platform (exit code 1)
    #[error("{message}")]
    Acquisition { message: String },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            LoadError::Acquisition { .. } => 1,
            _ => 2,
        }
    }
}

/// Errors from the built-in TypeScript compiler.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid type name \"{name}\": expected a TypeScript identifier")]
    InvalidTypeName { name: String },
}

/// Errors from the end-to-end [`Generator`](crate::Generator).
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl GenerateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateError::Load(e) => e.exit_code(),
            GenerateError::Compile(_) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("schema.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::MissingBody {
            part: "response".into(),
        };
        assert_eq!(err.exit_code(), 2);

        let err = LoadError::Acquisition {
            message: "please log in first".into(),
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn acquisition_message_is_verbatim() {
        let err = LoadError::Acquisition {
            message: "请先登录".into(),
        };
        assert_eq!(err.to_string(), "请先登录");
    }

    #[test]
    fn generate_error_exit_codes() {
        let err = GenerateError::from(CompileError::InvalidTypeName { name: "1x".into() });
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "invalid type name \"1x\": expected a TypeScript identifier"
        );

        let err = GenerateError::from(LoadError::FileNotFound {
            path: PathBuf::from("x.json"),
        });
        assert_eq!(err.exit_code(), 3);
    }
}
