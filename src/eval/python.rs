//! [`Evaluator`] backed by a Python interpreter subprocess.
//!
//! Each evaluation runs a small driver script with `python3 -c`. The scope
//! and expression are sent as JSON on stdin; the driver answers with one
//! JSON object on stdout tagged by `status`. Anything the expression prints
//! is redirected to stderr so it cannot corrupt the reply.

use super::{EvalError, EvalValue, Evaluator, ResultFormat, Scope};
use crate::subprocess::{ProcessCommandBuilder, SubprocessManager};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

const DRIVER: &str = include_str!("driver.py");

#[derive(Debug, Serialize)]
struct DriverRequest<'a> {
    expression: &'a str,
    bindings: BTreeMap<&'a str, &'a Value>,
    modules: BTreeMap<&'a str, &'a str>,
    prefer_json: bool,
    width: usize,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum DriverReply {
    Ok { result: EvalValue },
    NameError { message: String },
    ImportError { module: String, message: String },
    Error { message: String },
}

pub struct PythonEvaluator {
    subprocess: SubprocessManager,
    interpreter: String,
    timeout: Option<Duration>,
}

impl PythonEvaluator {
    pub fn new(subprocess: SubprocessManager, interpreter: impl Into<String>) -> Self {
        Self {
            subprocess,
            interpreter: interpreter.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn parse_reply(stdout: &str) -> Result<EvalValue, EvalError> {
        let reply: DriverReply = serde_json::from_str(stdout.trim()).map_err(|e| {
            EvalError::Interpreter(format!("unreadable reply from Python driver: {e}"))
        })?;

        match reply {
            DriverReply::Ok { result } => Ok(result),
            DriverReply::NameError { message } => Err(EvalError::from_message(message)),
            DriverReply::ImportError { module, message } => {
                Err(EvalError::ImportFailed { module, message })
            }
            DriverReply::Error { message } => Err(EvalError::Raised(message)),
        }
    }
}

#[async_trait]
impl Evaluator for PythonEvaluator {
    async fn evaluate(
        &self,
        expression: &str,
        scope: &Scope,
        format: ResultFormat,
    ) -> Result<EvalValue, EvalError> {
        let request = DriverRequest {
            expression,
            bindings: scope.values().collect(),
            modules: scope.modules().collect(),
            prefer_json: format.prefer_json,
            width: format.width,
        };
        let payload =
            serde_json::to_string(&request).map_err(|e| EvalError::Interpreter(e.to_string()))?;

        tracing::debug!(
            "Evaluating with {} ({} modules bound)",
            self.interpreter,
            request.modules.len()
        );

        let command = ProcessCommandBuilder::new(&self.interpreter)
            .args(["-c", DRIVER])
            .stdin(payload)
            .timeout(self.timeout)
            .build();

        let output = self
            .subprocess
            .run(command)
            .await
            .map_err(|e| EvalError::Interpreter(e.to_string()))?;

        if !output.stderr.is_empty() {
            tracing::debug!("Python stderr: {}", output.stderr.trim_end());
        }

        if !output.status.success() {
            return Err(EvalError::Interpreter(format!(
                "{} exited with {:?}: {}",
                self.interpreter,
                output.status,
                output.stderr.trim()
            )));
        }

        Self::parse_reply(&output.stdout)
    }
}
