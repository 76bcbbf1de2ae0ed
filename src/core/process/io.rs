// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdin write (optional)
//!   stdout/stderr reader tasks --> JoinHandle<String>
//!   wait | timeout | cancellation
//!   --> ProcessOutput { stdout, stderr, exit_code, interrupted }
//! ```
//!
//! Readers own their captured text, so a chatty child can never block on a
//! full pipe while we wait for it.

use crate::error::{ProcessError, Result};
use anyhow::Context;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};

/// How long a child gets to react to `CTRL_BREAK` before being killed.
#[cfg(windows)]
const GRACEFUL_SHUTDOWN: Duration = Duration::from_millis(500);

enum Completion {
    Exited(std::process::ExitStatus),
    Interrupted(std::process::ExitStatus),
    TimedOut(Duration),
}

fn spawn_reader<R>(
    stream: Option<R>,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &'static str,
) -> Option<JoinHandle<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    if !flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
        return None;
    }
    let name = process_name.to_string();
    stream.map(|stream| tokio::spawn(read_stream(stream, flags, name, stream_name)))
}

async fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    match handle {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    }
}

/// Terminates a child process (Windows: `CTRL_BREAK` first, then kill).
async fn terminate_process(child: &mut Child, graceful: bool) {
    #[cfg(windows)]
    if graceful && let Some(pid) = child.id() {
        if let Err(e) = super::windows::send_ctrl_break(pid) {
            tracing::debug!(pid, error = %e, "CTRL_BREAK failed, will force kill");
        } else {
            tokio::time::sleep(GRACEFUL_SHUTDOWN).await;
        }
    }
    #[cfg(not(windows))]
    let _ = graceful;

    child.kill().await.ok();
}

impl ProcessBuilder {
    /// Runs the spawned child, streaming its output until it exits, times
    /// out, or `token` is cancelled.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
        token: Option<CancellationToken>,
    ) -> Result<ProcessOutput> {
        let stdout = spawn_reader(child.stdout.take(), self.stdout_stream(), name, "stdout");
        let stderr = spawn_reader(child.stderr.take(), self.stderr_stream(), name, "stderr");

        self.write_stdin(name, child).await?;

        let token = token.unwrap_or_default();
        let timeout = self.timeout_duration();
        let graceful = !self
            .process_flags()
            .contains(ProcessFlags::TERMINATE_ON_INTERRUPT);

        let completion = tokio::select! {
            status = child.wait() => Completion::Exited(status?),
            () = token.cancelled() => {
                warn!(process = %name, "Cancellation requested, terminating process");
                terminate_process(child, graceful).await;
                let status = child.wait().await
                    .with_context(|| format!("failed waiting for process {name} to exit"))?;
                Completion::Interrupted(status)
            }
            () = sleep_or_forever(timeout) => {
                let limit = timeout.unwrap_or_default();
                warn!(process = %name, timeout = ?limit, "Process timed out");
                terminate_process(child, false).await;
                Completion::TimedOut(limit)
            }
        };

        let stdout = join_reader(stdout).await;
        let stderr = join_reader(stderr).await;

        match completion {
            Completion::Exited(status) => Ok(ProcessOutput::new(
                status.code().unwrap_or(-1),
                stdout,
                stderr,
                false,
            )),
            Completion::Interrupted(status) => Ok(ProcessOutput::new(
                status.code().unwrap_or(-1),
                stdout,
                stderr,
                true,
            )),
            Completion::TimedOut(limit) => Err(ProcessError::Timeout {
                command: name.to_string(),
                timeout_secs: limit.as_secs(),
            }
            .into()),
        }
    }

    async fn write_stdin(&self, name: &str, child: &mut Child) -> Result<()> {
        if let Some(stdin_content) = self.stdin_content()
            && let Some(mut stdin) = child.stdin.take()
        {
            use tokio::io::AsyncWriteExt;
            stdin
                .write_all(stdin_content.as_bytes())
                .await
                .with_context(|| format!("failed to write to stdin for process {name}"))?;
        }
        Ok(())
    }
}

async fn sleep_or_forever(timeout: Option<Duration>) {
    match timeout {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

/// Reads a stream line by line, forwarding to the log and/or collecting it.
///
/// Invalid UTF-8 is replaced rather than ending the stream.
async fn read_stream<R>(
    reader: R,
    flags: StreamFlags,
    process_name: String,
    stream_name: &'static str,
) -> String
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut captured = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\r', '\n']);
                if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                    trace!(process = %process_name, stream = stream_name, line = %line, "output");
                }
                if flags.contains(StreamFlags::KEEP_IN_STRING) {
                    if !captured.is_empty() {
                        captured.push('\n');
                    }
                    captured.push_str(line);
                }
            }
            Err(e) => {
                warn!(
                    process = %process_name,
                    stream = stream_name,
                    error = %e,
                    "error reading stream"
                );
                break;
            }
        }
    }

    captured
}
