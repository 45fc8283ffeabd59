//! The five input-to-output conversions a user can pick from.
//!
//! Every handler turns `(input, code)` into an [`Output`]. Failures caused
//! by the input or the code end up in [`Output::err`]; only failures of the
//! cache file escape as [`crate::Error`].

pub mod help;
pub mod javascript;
pub mod jq;
pub mod python;
pub mod shell;

pub use javascript::JscJson;
pub use jq::Jq;
pub use python::{PyJson, PyTxt, PythonContext};
pub use shell::ShellTxt;

use crate::config::Config;
use crate::error::Result;
use crate::eval::{Evaluator, ModuleRegistry, ModuleResolver, PythonEvaluator};
use crate::output::{Output, OutputCache};
use crate::subprocess::SubprocessManager;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TransformKind {
    /// Evaluate Python against the input parsed as JSON (`j`)
    #[value(name = "py_json")]
    PyJson,
    /// Evaluate Python against the raw input (`txt`)
    #[value(name = "py_txt")]
    PyTxt,
    /// Run a shell pipeline with the input in `$txt`
    #[value(name = "shell_txt")]
    ShellTxt,
    /// Evaluate JavaScript against the input parsed as JSON (`j`)
    #[value(name = "jsc_json")]
    JscJson,
    /// Filter the input with jq
    #[value(name = "jq")]
    Jq,
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransformKind::PyJson => "py_json",
            TransformKind::PyTxt => "py_txt",
            TransformKind::ShellTxt => "shell_txt",
            TransformKind::JscJson => "jsc_json",
            TransformKind::Jq => "jq",
        };
        f.write_str(name)
    }
}

#[async_trait]
pub trait Transform: Send + Sync {
    async fn apply(&self, input: &str, code: &str, cache: &OutputCache) -> Result<Output>;
}

/// Builds handlers from configuration.
pub struct TransformFactory {
    config: Config,
    subprocess: SubprocessManager,
    python: PythonContext,
}

impl TransformFactory {
    pub fn new(config: &Config, subprocess: SubprocessManager) -> Self {
        let evaluator = PythonEvaluator::new(subprocess.clone(), &config.python.interpreter)
            .with_timeout(config.process.timeout());

        Self {
            config: config.clone(),
            python: PythonContext {
                evaluator: Arc::new(evaluator),
                resolver: Arc::new(ModuleRegistry::from_config(&config.python)),
                help_template: config.python.help_template.clone(),
            },
            subprocess,
        }
    }

    /// Replace the Python interpreter boundary.
    pub fn with_evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.python.evaluator = evaluator;
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ModuleResolver>) -> Self {
        self.python.resolver = resolver;
        self
    }

    pub fn create(&self, kind: TransformKind) -> Box<dyn Transform> {
        let display = &self.config.display;
        let timeout = self.config.process.timeout();

        match kind {
            TransformKind::PyJson => {
                Box::new(PyJson::new(self.python.clone(), display.json_dump_width))
            }
            TransformKind::PyTxt => Box::new(PyTxt::new(self.python.clone(), display.line_width)),
            TransformKind::ShellTxt => Box::new(
                ShellTxt::new(self.subprocess.clone(), &self.config.shell.program)
                    .with_man_width(display.line_width)
                    .with_timeout(timeout),
            ),
            TransformKind::JscJson => Box::new(JscJson),
            TransformKind::Jq => Box::new(
                Jq::new(self.subprocess.clone(), &self.config.jq.program)
                    .with_args(self.config.jq.args.clone())
                    .with_timeout(timeout),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in TransformKind::value_variants() {
            let parsed = TransformKind::from_str(&kind.to_string(), false).unwrap();
            assert_eq!(parsed, *kind);
        }
        assert!(TransformKind::from_str("eval", false).is_err());
    }

    #[tokio::test]
    async fn test_factory_wires_configured_programs() {
        let mut config = Config::new();
        config.jq.program = "/opt/jq".to_string();
        config.jq.args = vec!["-S".to_string()];

        let (subprocess, mock) = SubprocessManager::mock();
        mock.expect_command("/opt/jq").returns_stdout("{}\n").finish();

        let dir = tempfile::TempDir::new().unwrap();
        let cache = OutputCache::new(dir.path().join("out.txt"));
        let output = TransformFactory::new(&config, subprocess)
            .create(TransformKind::Jq)
            .apply("{}", ".", &cache)
            .await
            .unwrap();

        assert!(!output.is_err());
        assert_eq!(mock.get_call_history()[0].args, vec!["-S", "."]);
    }
}
