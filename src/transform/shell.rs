use super::help::{self, Request};
use super::Transform;
use crate::error::Result;
use crate::output::{Output, OutputCache};
use crate::subprocess::{ProcessCommandBuilder, SubprocessManager};
use async_trait::async_trait;
use std::time::Duration;

/// Shell pipeline over the raw input, exposed as `$txt`.
pub struct ShellTxt {
    subprocess: SubprocessManager,
    program: String,
    man_width: usize,
    timeout: Option<Duration>,
}

impl ShellTxt {
    pub fn new(subprocess: SubprocessManager, program: &str) -> Self {
        Self {
            subprocess,
            program: program.to_string(),
            man_width: 59,
            timeout: None,
        }
    }

    pub fn with_man_width(mut self, width: usize) -> Self {
        self.man_width = width;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Transform for ShellTxt {
    async fn apply(&self, input: &str, code: &str, cache: &OutputCache) -> Result<Output> {
        let mut output = Output::new(
            cache.clone(),
            "Process Text with Shell Commands",
            "variable: \"$txt\" (use ? for man page eg. `ls | cut?`)",
        );

        let mut builder = ProcessCommandBuilder::new(&self.program)
            .env("txt", input)
            .stdin("")
            .timeout(self.timeout);

        let man_page = match help::parse(code) {
            Request::Help(target) => help::shell_help(target),
            Request::Run(_) => None,
        };

        let script = match man_page {
            Some((command, rewritten)) => {
                tracing::debug!("Showing man page for {}", command);
                builder = builder.env("MANWIDTH", &self.man_width.to_string());
                rewritten
            }
            None => code.to_string(),
        };

        match self
            .subprocess
            .run(builder.args(["-c", script.as_str()]).build())
            .await
        {
            Err(e) => output.fail(e),
            Ok(result) if !result.status.success() => {
                output.fail(format!("{}\n{}", result.stdout, result.stderr));
            }
            Ok(result) => output.set_text(result.stdout)?,
        }
        Ok(output)
    }
}
