//! Shell execution with captured output
//!
//! Runs exactly one resolved command through the OS-appropriate shell and
//! returns whatever happened as data. A failing command is not an error:
//! its captured stderr and exit code come back in the result. On Windows
//! the command is handed to PowerShell as a single argument rather than a
//! shared shell string.

use crate::os_profile::OsIdentity;
use crate::structured_log::{log_event, LogLevel};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::process::Stdio;
use tokio::process::Command;

/// Captured outcome of one command execution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    /// Set when the command could not be run at all (spawn failure,
    /// executable not found).
    pub error: Option<String>,
}

impl ExecResult {
    pub fn success(&self) -> bool {
        self.error.is_none() && self.exit_code == Some(0)
    }

    /// True when the executable name could not be resolved.
    pub fn command_not_found(&self) -> bool {
        self.error
            .as_deref()
            .map(|e| e.starts_with("command not found"))
            .unwrap_or(false)
            // POSIX shells report an unresolvable name with exit 127.
            || self.exit_code == Some(127)
    }

    /// What the user should see: stdout on success, otherwise the captured
    /// stderr (or the spawn error when nothing ran).
    pub fn display_output(&self) -> &str {
        if let Some(error) = &self.error {
            error
        } else if self.success() || self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }

    fn spawn_failure(message: String) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            error: Some(message),
        }
    }
}

/// Execute a command through the OS shell, capturing both streams.
///
/// Never returns an error: failures are encoded in the result so a slow or
/// broken command cannot take down the caller.
pub async fn execute(command: &str, os: OsIdentity) -> ExecResult {
    let trimmed = command.trim();
    if trimmed.is_empty() {
        return ExecResult::spawn_failure("no command to execute".to_string());
    }

    let mut cmd = if os.is_windows() {
        let mut c = Command::new("powershell.exe");
        c.arg("-NoProfile").arg("-Command").arg(trimmed);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(trimmed);
        c
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let exec_id = format!("exec-{}", uuid::Uuid::new_v4());
    match cmd.output().await {
        Ok(output) => {
            let result = ExecResult {
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                exit_code: output.status.code(),
                error: None,
            };
            log_event(
                LogLevel::Debug,
                "EXEC",
                "finished",
                json!({"id": exec_id, "command": trimmed, "exit_code": result.exit_code}),
            );
            result
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let name = trimmed.split_whitespace().next().unwrap_or(trimmed);
            ExecResult::spawn_failure(format!("command not found: {}", name))
        }
        Err(e) => {
            log_event(
                LogLevel::Warn,
                "EXEC",
                "spawn_failed",
                json!({"id": exec_id, "command": trimmed, "error": e.to_string()}),
            );
            ExecResult::spawn_failure(format!("failed to run command: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout() {
        let result = execute("echo hello", OsIdentity::detect()).await;
        assert!(result.success());
        assert_eq!(result.display_output().trim(), "hello");
    }

    #[tokio::test]
    async fn test_nonzero_exit_returns_stderr_as_output() {
        let result = execute("ls /definitely/not/a/real/path", OsIdentity::detect()).await;
        assert!(!result.success());
        assert!(result.error.is_none());
        assert!(!result.display_output().is_empty());
        assert_eq!(result.display_output(), result.stderr);
    }

    #[tokio::test]
    async fn test_command_not_found_is_distinguishable() {
        let result = execute("definitely_not_a_real_command_xyz", OsIdentity::detect()).await;
        assert!(!result.success());
        assert!(result.command_not_found());
    }

    #[tokio::test]
    async fn test_empty_command_is_rejected() {
        let result = execute("   ", OsIdentity::detect()).await;
        assert!(!result.success());
        assert_eq!(result.display_output(), "no command to execute");
    }
}
