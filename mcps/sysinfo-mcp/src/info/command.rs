//! External command execution for collectors backed by system utilities

use std::process::Stdio;
use std::time::Duration;

use mcp_common::ToolError;
use thiserror::Error;
use tokio::process::Command;

/// Upper bound for a helper utility, kept below the dispatcher's call timeout
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0} is not installed")]
    NotInstalled(String),

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("{program} did not finish within {secs}s")]
    TimedOut { program: String, secs: u64 },

    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<CommandError> for ToolError {
    fn from(err: CommandError) -> Self {
        match &err {
            CommandError::NotInstalled(_) | CommandError::Failed { .. } => {
                ToolError::not_available(err.to_string())
            }
            CommandError::TimedOut { .. } => ToolError::timeout(err.to_string()),
            CommandError::Io { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                ToolError::permission_denied(err.to_string())
            }
            CommandError::Io { .. } => ToolError::internal(err.to_string()),
        }
    }
}

/// Run `program` and return its stdout
///
/// The child is killed when the returned future is dropped, so cancelling a
/// tool call also stops the utility.
pub async fn run(program: &str, args: &[&str]) -> Result<String, CommandError> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(COMMAND_TIMEOUT, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CommandError::NotInstalled(program.to_string()))
        }
        Ok(Err(source)) => {
            return Err(CommandError::Io {
                program: program.to_string(),
                source,
            })
        }
        Err(_elapsed) => {
            return Err(CommandError::TimedOut {
                program: program.to_string(),
                secs: COMMAND_TIMEOUT.as_secs(),
            })
        }
    };

    if !output.status.success() {
        return Err(CommandError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
