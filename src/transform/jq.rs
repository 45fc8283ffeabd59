use super::Transform;
use crate::error::Result;
use crate::output::{Lexer, Output, OutputCache};
use crate::subprocess::{ProcessCommandBuilder, SubprocessManager};
use async_trait::async_trait;
use std::time::Duration;

/// Pipes the input through the `jq` executable.
pub struct Jq {
    subprocess: SubprocessManager,
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl Jq {
    pub fn new(subprocess: SubprocessManager, program: &str) -> Self {
        Self {
            subprocess,
            program: program.to_string(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Arguments placed before the filter.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Transform for Jq {
    async fn apply(&self, input: &str, code: &str, cache: &OutputCache) -> Result<Output> {
        let mut output = Output::new(cache.clone(), "Process JSON with jq", "");

        let command = ProcessCommandBuilder::new(&self.program)
            .args(&self.args)
            .arg(code)
            .stdin(input)
            .timeout(self.timeout)
            .build();

        // jq reports problems on stderr; its exit status is not consulted.
        match self.subprocess.run(command).await {
            Err(e) => output.fail(e),
            Ok(result) if !result.stderr.is_empty() => output.fail(result.stderr),
            Ok(result) => {
                output.set_text(result.stdout)?;
                output.lexer = Lexer::Json;
            }
        }
        Ok(output)
    }
}
