//! # process-text
//!
//! Alfred workflow backend that transforms a block of text with a short
//! snippet of code and previews the result.
//!
//! ## Usage
//!
//! ```bash
//! process-text [-v...] [--config PATH] <py_json|py_txt|shell_txt|jsc_json|jq> <code>
//! ```
//!
//! ## Modules
//!
//! - `app` - Logging setup and the single-invocation pipeline
//! - `config` - TOML configuration with environment overrides
//! - `eval` - Python evaluation with automatic module imports
//! - `output` - The result of a transform and its on-disk cache
//! - `render` - Syntax highlighting, HTML preview and Alfred JSON
//! - `subprocess` - Subprocess abstraction with a mockable runner
//! - `transform` - The five transforms and the help marker
pub mod app;
pub mod config;
pub mod error;
pub mod eval;
pub mod output;
pub mod render;
pub mod subprocess;
pub mod transform;

pub use error::{Error, Result};
