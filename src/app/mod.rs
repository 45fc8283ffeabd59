//! Application module
//!
//! Wires the library together for the binary:
//! - Logging setup
//! - The transform pipeline for a single invocation
//! - Fatal error reporting

pub mod config;
pub mod error_handling;
pub mod logging;
pub mod runtime;

pub use config::AppConfig;
pub use error_handling::handle_fatal_error;
pub use logging::init_logging;
pub use runtime::{run, run_with_factory, Invocation};
