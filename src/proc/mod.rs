//! Subprocess orchestration for the external toolchain.
//!
//! Every harness shells out synchronously: spawn, wait, capture. There is
//! no timeout handling beyond the invoked tool's own exit; missing tools
//! are detected up front with `which` so a run never dies halfway through.

pub mod logs;
pub mod makefile;

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use thiserror::Error;

/// Errors from the process layer.
#[derive(Debug, Error)]
pub enum ProcError {
    #[error("{tool} not found, please install it to proceed")]
    ToolMissing { tool: String },

    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        source: io::Error,
    },

    #[error("'{program}' produced no capturable stdout")]
    NoStdout { program: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Captured output of a finished command.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: Option<i32>,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            exit_code: output.status.code(),
        }
    }
}

/// Run a command and wait for completion, capturing stdout and stderr.
pub fn run_command<I, S>(program: &str, args: I) -> Result<CommandOutput, ProcError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| ProcError::Spawn {
            program: program.to_string(),
            source,
        })?;
    Ok(CommandOutput::from(output))
}

/// Run `producer | consumer` with identical argument handling to a shell
/// pipeline: the producer's stdout feeds the consumer's stdin, and the
/// consumer's output is captured.
pub fn run_piped(
    producer: &str,
    producer_args: &[String],
    consumer: &str,
    consumer_args: &[String],
) -> Result<CommandOutput, ProcError> {
    let mut producer_child = Command::new(producer)
        .args(producer_args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| ProcError::Spawn {
            program: producer.to_string(),
            source,
        })?;

    let producer_stdout = producer_child
        .stdout
        .take()
        .ok_or_else(|| ProcError::NoStdout {
            program: producer.to_string(),
        })?;

    let output = Command::new(consumer)
        .args(consumer_args)
        .stdin(Stdio::from(producer_stdout))
        .output()
        .map_err(|source| ProcError::Spawn {
            program: consumer.to_string(),
            source,
        })?;

    producer_child.wait()?;

    Ok(CommandOutput::from(output))
}

/// Check that an external tool is on `PATH`, via `which`.
pub fn require_tool(tool: &str) -> Result<(), ProcError> {
    let output = run_command("which", [tool])?;
    if output.success {
        Ok(())
    } else {
        Err(ProcError::ToolMissing {
            tool: tool.to_string(),
        })
    }
}

/// Whether `path` names an existing file executable by the current user.
pub fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn run_command_captures_exit_status() {
        let ok = run_command("true", std::iter::empty::<&str>()).unwrap();
        assert!(ok.success);
        assert_eq!(ok.exit_code, Some(0));

        let bad = run_command("false", std::iter::empty::<&str>()).unwrap();
        assert!(!bad.success);
    }

    #[test]
    fn run_command_captures_stdout() {
        let out = run_command("echo", ["hello"]).unwrap();
        assert_eq!(out.stdout, "hello\n");
        assert!(out.stderr.is_empty());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = run_command("moulinette-no-such-tool", std::iter::empty::<&str>());
        assert!(matches!(err, Err(ProcError::Spawn { .. })));
    }

    #[test]
    fn run_piped_feeds_producer_into_consumer() {
        let out = run_piped("echo", &["hello".to_string()], "cat", &[]).unwrap();
        assert!(out.success);
        assert_eq!(out.stdout, "hello\n");
    }

    #[test]
    fn require_tool_resolves_via_which() {
        assert!(require_tool("sh").is_ok());
        assert!(matches!(
            require_tool("moulinette-no-such-tool"),
            Err(ProcError::ToolMissing { .. })
        ));
    }
}
