//! Shared runner for external media tools.

use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

const STDERR_TAIL_BYTES: usize = 2048;

#[derive(Debug, thiserror::Error)]
pub(crate) enum ToolError {
    #[error("failed to execute {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} timed out after {}s", .timeout.as_secs())]
    TimedOut { tool: String, timeout: Duration },
}

/// Run `command` to completion and capture its output.
///
/// The child is killed if the returned future is dropped or the timeout
/// elapses, so cancelling an upload never leaves a tool running.
pub(crate) async fn run_tool(
    tool: &str,
    mut command: Command,
    timeout: Option<Duration>,
) -> Result<Output, ToolError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = command.output();
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, output).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(tool = %tool, timeout_secs = limit.as_secs(), "Media tool timed out, killing process");
                return Err(ToolError::TimedOut {
                    tool: tool.to_string(),
                    timeout: limit,
                });
            }
        },
        None => output.await,
    };

    result.map_err(|source| ToolError::Spawn {
        tool: tool.to_string(),
        source,
    })
}

/// Last few KiB of a tool's stderr, lossily decoded.
pub(crate) fn stderr_tail(stderr: &[u8]) -> Option<String> {
    let start = stderr.len().saturating_sub(STDERR_TAIL_BYTES);
    let text = String::from_utf8_lossy(&stderr[start..]).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_tail() {
        assert_eq!(stderr_tail(b""), None);
        assert_eq!(stderr_tail(b"  \n"), None);
        assert_eq!(stderr_tail(b"moov atom not found\n").as_deref(), Some("moov atom not found"));

        let long = vec![b'x'; STDERR_TAIL_BYTES * 2];
        assert_eq!(stderr_tail(&long).unwrap().len(), STDERR_TAIL_BYTES);
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let command = Command::new("/nonexistent/vidstage-ffprobe");
        let err = run_tool("ffprobe", command, None).await.unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_tool() {
        let mut command = Command::new("sleep");
        command.arg("5");
        let err = run_tool("sleep", command, Some(Duration::from_millis(50)))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::TimedOut { .. }));
    }
}
