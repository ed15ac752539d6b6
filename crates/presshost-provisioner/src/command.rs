use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to spawn {program}: {details}")]
    Spawn { program: String, details: String },
}

/// Captured result of one external command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }

    /// Diagnostic text for error reporting: stderr if present, else stdout
    pub fn diagnostic(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Capability boundary for invoking external tools. Arguments are always
/// passed as an argv array; nothing here goes through a shell.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<CommandOutput, CommandError>;
}

/// CommandRunner backed by tokio::process
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<CommandOutput, CommandError> {
        debug!("Running command: {} {}", program, args.join(" "));

        let mut command = tokio::process::Command::new(program);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| CommandError::Spawn {
            program: program.to_string(),
            details: e.to_string(),
        })?;

        Ok(CommandOutput {
            status_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_system_runner_captures_stdout() {
        let runner = SystemCommandRunner;
        let output = runner.run("echo", &["hello"], None).await.unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_system_runner_reports_missing_program() {
        let runner = SystemCommandRunner;
        let result = runner
            .run("presshost-no-such-binary", &[], None)
            .await;

        assert!(matches!(result, Err(CommandError::Spawn { .. })));
    }

    #[test]
    fn test_diagnostic_prefers_stderr() {
        let output = CommandOutput {
            status_code: Some(1),
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        assert_eq!(output.diagnostic(), "err");

        let output = CommandOutput {
            status_code: Some(1),
            stdout: "out".to_string(),
            stderr: "  ".to_string(),
        };
        assert_eq!(output.diagnostic(), "out");
    }
}
