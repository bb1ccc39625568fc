//! Process execution utilities with timeout support
//!
//! Provides helpers for running the external media tools (ffmpeg, yt-dlp)
//! with configurable timeouts so a hung process can't pin a user's session forever.

use std::io::ErrorKind;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

use crate::download::error::DownloadError;

/// Timeout for `--version` probes at startup
pub const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Run an async Command to completion with a timeout, capturing both output streams.
///
/// The child is killed when the timeout fires.
pub async fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<Output, DownloadError> {
    let program = cmd.as_std().get_program().to_string_lossy().into_owned();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
            Err(DownloadError::Spawn(format!("{} is not installed or not on PATH", program)))
        }
        Ok(Err(e)) => Err(DownloadError::Spawn(format!("Failed to run {}: {}", program, e))),
        Err(_) => Err(DownloadError::Timeout(format!(
            "{} timed out after {}s",
            program,
            timeout.as_secs()
        ))),
    }
}

/// Last `max_lines` non-empty lines of a captured stream.
pub fn output_tail(bytes: &[u8], max_lines: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text.lines().map(str::trim_end).filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}

/// Human-readable exit status, e.g. `exit code 1` or `signal` when killed.
pub fn describe_exit(output: &Output) -> String {
    match output.status.code() {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Returns the first line of `<bin> <flag>` output, or None when the tool is unavailable.
pub async fn probe_tool_version(bin: &str, flag: &str) -> Option<String> {
    let mut cmd = Command::new(bin);
    cmd.arg(flag);
    let output = run_with_timeout(&mut cmd, VERSION_PROBE_TIMEOUT).await.ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|l| l.trim().to_string())
}
