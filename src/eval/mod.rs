//! Expression evaluation with on-demand module imports.
//!
//! The interpreter itself sits behind [`Evaluator`]; which identifiers may
//! be imported is decided by a [`ModuleResolver`]. [`eval_with_auto_import`]
//! ties the two together.

pub mod auto_import;
pub mod modules;
pub mod python;
pub mod scope;

pub use auto_import::eval_with_auto_import;
pub use modules::{ModuleRegistry, ModuleResolver};
pub use python::PythonEvaluator;
pub use scope::{Binding, Scope};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static UNDEFINED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"name '([^']+)' is not defined").expect("valid regex"));

/// A successfully evaluated result, classified by the interpreter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EvalValue {
    /// The result was a string.
    Str(String),
    /// JSON text of a non-string result, exactly as the interpreter
    /// serialized it.
    Json(String),
    /// Pretty-printed dump of any other result.
    Repr(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("{message}")]
    UndefinedName { name: String, message: String },

    #[error("{message}")]
    ImportFailed { module: String, message: String },

    #[error("{0}")]
    Raised(String),

    #[error("Interpreter error: {0}")]
    Interpreter(String),
}

impl EvalError {
    /// Classify an interpreter error message, recognising undefined names.
    pub fn from_message(message: String) -> Self {
        match undefined_name(&message) {
            Some(name) => EvalError::UndefinedName {
                name: name.to_string(),
                message,
            },
            None => EvalError::Raised(message),
        }
    }
}

/// How non-string results should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultFormat {
    /// Emit JSON-serializable results as [`EvalValue::Json`].
    pub prefer_json: bool,
    /// Line width for pretty-printed dumps.
    pub width: usize,
}

#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(
        &self,
        expression: &str,
        scope: &Scope,
        format: ResultFormat,
    ) -> Result<EvalValue, EvalError>;
}

/// Extract the identifier from a `name 'x' is not defined` message.
pub fn undefined_name(message: &str) -> Option<&str> {
    UNDEFINED_NAME
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
