//! Bounded shell execution inside the workspace root

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

use crate::SandboxError;

/// Captured result of a finished shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Render for the model: stdout, then stderr under a separator, then a
    /// non-zero exit annotation. Empty output becomes `(no output)`.
    pub fn render(&self) -> String {
        let mut output = String::new();
        if !self.stdout.is_empty() {
            output.push_str(&self.stdout);
        }
        if !self.stderr.is_empty() {
            if output.is_empty() {
                output.push_str(&self.stderr);
            } else {
                output.push_str("\n--- stderr ---\n");
                output.push_str(&self.stderr);
            }
        }
        match self.exit_code {
            Some(0) => {}
            Some(code) => output.push_str(&format!("\n(exit code: {})", code)),
            None => output.push_str("\n(terminated by signal)"),
        }

        let trimmed = output.trim();
        if trimmed.is_empty() {
            "(no output)".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }

    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        // Own process group, so a timeout can take down every descendant
        cmd.process_group(0);
        cmd
    }
}

/// SIGKILL the process group led by `pid`
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        tracing::debug!(pid, error = %e, "Failed to kill process group");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

/// Run `command` through the platform shell with `root` as working directory.
///
/// The child and everything it spawned are killed when `timeout` expires.
pub async fn run_shell(
    root: &Path,
    command: &str,
    timeout: Duration,
) -> Result<CommandOutput, SandboxError> {
    let start = Instant::now();

    let child = shell_command(command)
        .current_dir(root)
        .env("PYTHONDONTWRITEBYTECODE", "1")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;
    let pid = child.id();

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::warn!(command, ?timeout, "Shell command timed out");
            kill_process_group(pid);
            return Err(SandboxError::Timeout {
                seconds: timeout.as_secs_f64(),
            });
        }
    };

    tracing::debug!(
        command,
        exit_code = ?output.status.code(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Shell command finished"
    );

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stdout: &str, stderr: &str, exit_code: Option<i32>) -> CommandOutput {
        CommandOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
        }
    }

    #[test]
    fn test_render_stdout_only() {
        assert_eq!(output("hello\n", "", Some(0)).render(), "hello");
    }

    #[test]
    fn test_render_stderr_only_has_no_separator() {
        assert_eq!(output("", "oops\n", Some(0)).render(), "oops");
    }

    #[test]
    fn test_render_both_streams_and_exit_code() {
        assert_eq!(
            output("out\n", "err\n", Some(2)).render(),
            "out\n\n--- stderr ---\nerr\n\n(exit code: 2)"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(output("", "", Some(0)).render(), "(no output)");
        assert_eq!(output("  \n", "", Some(0)).render(), "(no output)");
    }

    #[test]
    fn test_render_exit_code_without_output() {
        assert_eq!(output("", "", Some(1)).render(), "(exit code: 1)");
    }
}
