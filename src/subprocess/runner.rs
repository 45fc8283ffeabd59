use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use super::error::ProcessError;

#[derive(Debug, Clone)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Added on top of the inherited environment.
    pub env: HashMap<String, String>,
    pub timeout: Option<Duration>,
    pub stdin: Option<String>,
}

impl ProcessCommand {
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error(i32),
    Signal(i32),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Success => Some(0),
            ExitStatus::Error(code) => Some(*code),
            ExitStatus::Signal(_) => None,
        }
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError>;
}

pub struct TokioProcessRunner;

impl TokioProcessRunner {
    /// Log command execution details
    fn log_command_start(command: &ProcessCommand) {
        tracing::debug!("Executing subprocess: {}", command.display());

        if !command.env.is_empty() {
            tracing::debug!(
                "Extra environment variables: {}, total size: {} bytes",
                command.env.len(),
                command
                    .env
                    .iter()
                    .map(|(k, v)| k.len() + v.len() + 2)
                    .sum::<usize>()
            );
            tracing::trace!(
                "Environment keys: {:?}",
                command.env.keys().collect::<Vec<_>>()
            );
        }

        if let Some(ref stdin) = command.stdin {
            tracing::trace!("Stdin provided: {} bytes", stdin.len());
        }
    }

    fn configure_command(command: &ProcessCommand) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args);

        for (key, value) in &command.env {
            cmd.env(key, value);
        }

        if command.stdin.is_some() {
            cmd.stdin(std::process::Stdio::piped());
        } else {
            cmd.stdin(std::process::Stdio::null());
        }
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }

    /// Write stdin data to the child process
    async fn write_stdin(
        mut stdin: tokio::process::ChildStdin,
        stdin_data: &str,
    ) -> Result<(), ProcessError> {
        use tokio::io::AsyncWriteExt;
        // A child that exits without reading its input closes the pipe early.
        match stdin.write_all(stdin_data.as_bytes()).await {
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                tracing::trace!("Child closed stdin before reading all input");
            }
            other => other?,
        }
        stdin.shutdown().await.ok();
        Ok(())
    }

    /// Feed stdin while draining stdout and stderr, then wait for exit.
    ///
    /// Writing and reading run concurrently so a child that fills its output
    /// pipe before consuming all input cannot stall the exchange.
    async fn communicate(
        mut child: tokio::process::Child,
        stdin_data: Option<&str>,
    ) -> Result<std::process::Output, ProcessError> {
        let stdin = child.stdin.take();
        let writer = async move {
            match (stdin, stdin_data) {
                (Some(stdin), Some(data)) => Self::write_stdin(stdin, data).await,
                _ => Ok(()),
            }
        };

        let (written, output) = tokio::join!(writer, child.wait_with_output());
        written?;
        output.map_err(ProcessError::Io)
    }

    async fn communicate_with_timeout(
        child: tokio::process::Child,
        stdin_data: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<std::process::Output, ProcessError> {
        match timeout {
            // Dropping the child on expiry kills it.
            Some(duration) => {
                match tokio::time::timeout(duration, Self::communicate(child, stdin_data)).await {
                    Ok(result) => result,
                    Err(_) => Err(ProcessError::Timeout(duration)),
                }
            }
            None => Self::communicate(child, stdin_data).await,
        }
    }

    fn parse_exit_status(status: std::process::ExitStatus) -> ExitStatus {
        if status.success() {
            ExitStatus::Success
        } else if let Some(code) = status.code() {
            ExitStatus::Error(code)
        } else {
            Self::parse_signal_status(status)
        }
    }

    #[cfg(unix)]
    fn parse_signal_status(status: std::process::ExitStatus) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            ExitStatus::Signal(signal)
        } else {
            ExitStatus::Error(1)
        }
    }

    #[cfg(not(unix))]
    fn parse_signal_status(_status: std::process::ExitStatus) -> ExitStatus {
        ExitStatus::Error(1)
    }

    fn log_result(result: &ProcessOutput, command: &ProcessCommand) {
        let command_str = command.display();

        match &result.status {
            ExitStatus::Success => {
                tracing::debug!(
                    "Subprocess completed successfully in {:?}: {}",
                    result.duration,
                    command_str
                );
                tracing::trace!("Stdout length: {} bytes", result.stdout.len());
                tracing::trace!("Stderr length: {} bytes", result.stderr.len());
            }
            ExitStatus::Error(code) => {
                tracing::debug!(
                    "Subprocess failed with exit code {} in {:?}: {}",
                    code,
                    result.duration,
                    command_str
                );
                if !result.stderr.is_empty() {
                    tracing::trace!("Stderr: {}", result.stderr);
                }
            }
            ExitStatus::Signal(signal) => {
                tracing::warn!(
                    "Subprocess terminated by signal {} in {:?}: {}",
                    signal,
                    result.duration,
                    command_str
                );
            }
        }
    }

    fn map_spawn_error(error: std::io::Error, command: &ProcessCommand) -> ProcessError {
        if error.kind() == std::io::ErrorKind::NotFound {
            tracing::error!("Command '{}' not found", command.program);
            ProcessError::CommandNotFound(command.program.clone())
        } else {
            tracing::error!(
                "Failed to spawn '{}': {:?} (kind: {:?})",
                command.program,
                error,
                error.kind()
            );
            ProcessError::SpawnFailed {
                command: command.display(),
                source: error,
            }
        }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        let start = std::time::Instant::now();

        Self::log_command_start(&command);

        let child = Self::configure_command(&command)
            .spawn()
            .map_err(|e| Self::map_spawn_error(e, &command))?;

        let output =
            Self::communicate_with_timeout(child, command.stdin.as_deref(), command.timeout)
                .await?;

        let result = ProcessOutput {
            status: Self::parse_exit_status(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration: start.elapsed(),
        };

        Self::log_result(&result, &command);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> ProcessCommand {
        ProcessCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            env: HashMap::new(),
            timeout: None,
            stdin: None,
        }
    }

    #[test]
    fn test_display_joins_args() {
        assert_eq!(sh("echo hi").display(), "sh -c echo hi");

        let mut bare = sh("");
        bare.args.clear();
        assert_eq!(bare.display(), "sh");
    }

    #[test]
    fn test_parse_exit_status() {
        use std::os::unix::process::ExitStatusExt;

        let status = std::process::ExitStatus::from_raw(0);
        assert_eq!(
            TokioProcessRunner::parse_exit_status(status),
            ExitStatus::Success
        );

        // Exit code 1
        let status = std::process::ExitStatus::from_raw(256);
        assert_eq!(
            TokioProcessRunner::parse_exit_status(status),
            ExitStatus::Error(1)
        );

        // Killed by SIGKILL
        let status = std::process::ExitStatus::from_raw(9);
        assert_eq!(
            TokioProcessRunner::parse_exit_status(status),
            ExitStatus::Signal(9)
        );
    }

    #[tokio::test]
    async fn test_stdin_is_forwarded() {
        let mut command = sh("cat");
        command.stdin = Some("test input".to_string());

        let output = TokioProcessRunner.run(command).await.unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, "test input");
    }

    #[tokio::test]
    async fn test_env_is_added_to_inherited_environment() {
        let mut command = sh("printf '%s:%s' \"$txt\" \"${PATH:+has-path}\"");
        command.env.insert("txt".to_string(), "hello".to_string());

        let output = TokioProcessRunner.run(command).await.unwrap();
        assert_eq!(output.stdout, "hello:has-path");
    }

    #[tokio::test]
    async fn test_child_ignoring_stdin_does_not_fail() {
        let mut command = sh("true");
        command.stdin = Some("x".repeat(1 << 20));

        let output = TokioProcessRunner.run(command).await.unwrap();
        assert!(output.status.success());
    }

    #[tokio::test]
    async fn test_large_stdin_is_streamed_while_output_drains() {
        let line = format!("{{\"k\":\"{}\"}}\n", "x".repeat(100));
        let input = line.repeat(10_000);
        let mut command = sh("cat");
        command.stdin = Some(input.clone());
        command.timeout = Some(Duration::from_secs(30));

        let output = TokioProcessRunner.run(command).await.unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout.len(), input.len());
        assert_eq!(output.stdout, input);
    }

    #[tokio::test]
    async fn test_timeout_covers_stdin_exchange() {
        // The child never reads, so the writer would block on a full pipe.
        let mut command = sh("sleep 5");
        command.stdin = Some("x".repeat(1 << 20));
        command.timeout = Some(Duration::from_millis(200));

        let result = TokioProcessRunner.run(command).await;
        assert!(matches!(result, Err(ProcessError::Timeout(_))));
    }
}
