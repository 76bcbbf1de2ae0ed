// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP downloads.
//!
//! ```text
//! Downloader::new()
//!   .url() .file() .progress() .cancel_token()
//!   .download()
//!        |
//!   <file>.part --stream--> rename to <file>
//!        |
//!   Progress: Bar | Spinner | Silent
//! ```
//!
//! Bytes go to `<file>.part` first, so an interrupted download never leaves
//! a truncated binary at the final path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Response};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{BuildResult, NetworkError};

/// Removes the partial file on drop unless the download completed.
struct PartialFileGuard {
    path: PathBuf,
    keep: bool,
}

impl PartialFileGuard {
    const fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    const fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if !self.keep {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(concat!("moqt-build/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        })
        .clone()
}

fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {bytes}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
        })
        .clone()
}

/// Progress display style for downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressDisplay {
    /// Progress bar when the size is known, spinner otherwise.
    #[default]
    Bar,
    Spinner,
    Silent,
}

/// Async HTTP downloader.
///
/// ```ignore
/// Downloader::new()
///     .url("https://github.com/bazelbuild/bazelisk/releases/download/v1.25.0/bazelisk-linux-amd64")
///     .file(layout.bazelisk_dir().join("bazelisk"))
///     .cancel_token(ctx.cancel_token().clone())
///     .download()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    url: Option<String>,
    output_file: Option<PathBuf>,
    cancel: CancellationToken,
    progress_display: ProgressDisplay,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: global_client().clone(),
            url: None,
            output_file: None,
            cancel: CancellationToken::new(),
            progress_display: ProgressDisplay::default(),
        }
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    #[must_use]
    pub const fn progress(mut self, style: ProgressDisplay) -> Self {
        self.progress_display = style;
        self
    }

    #[must_use]
    pub const fn silent(self) -> Self {
        self.progress(ProgressDisplay::Silent)
    }

    /// Aborts the transfer with `NetworkError::Interrupted` once `token` fires.
    #[must_use]
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    fn create_progress_bar(&self, total_size: u64) -> Option<ProgressBar> {
        let pb = match (self.progress_display, total_size) {
            (ProgressDisplay::Silent, _) => return None,
            (ProgressDisplay::Bar, size) if size > 0 => {
                let pb = ProgressBar::new(size);
                pb.set_style(bar_style());
                pb
            }
            _ => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(spinner_style());
                pb
            }
        };
        Some(pb)
    }

    fn require_url(&self) -> BuildResult<&str> {
        self.url
            .as_deref()
            .ok_or_else(|| NetworkError::InvalidUrl("no URL provided".to_string()).into())
    }

    async fn send(&self, url: &str) -> BuildResult<Response> {
        let response = tokio::select! {
            response = self.client.get(url).send() => response.map_err(NetworkError::Reqwest)?,
            () = self.cancel.cancelled() => return Err(NetworkError::Interrupted.into()),
        };

        if !response.status().is_success() {
            return Err(NetworkError::HttpError {
                status: response.status().as_u16(),
                url: url.to_string(),
            }
            .into());
        }
        Ok(response)
    }

    /// Downloads to the configured file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if no URL or output file is configured, the server
    /// answers with a non-success status, writing fails, or the download is
    /// cancelled. No file is left at the output path on error.
    pub async fn download(&self) -> BuildResult<()> {
        let url = self.require_url()?;
        let output = self
            .output_file
            .as_deref()
            .ok_or_else(|| NetworkError::DownloadFailed {
                url: url.to_string(),
                message: "no output file specified".to_string(),
            })?;

        let failed = |message: String| NetworkError::DownloadFailed {
            url: url.to_string(),
            message,
        };

        let response = self.send(url).await?;
        let progress_bar = self.create_progress_bar(response.content_length().unwrap_or(0));

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                failed(format!("failed to create directory {}: {e}", parent.display()))
            })?;
        }

        let partial = partial_path(output);
        let mut file = tokio::fs::File::create(&partial)
            .await
            .map_err(|e| failed(format!("failed to create {}: {e}", partial.display())))?;
        let mut guard = PartialFileGuard::new(partial.clone());

        let mut stream = response.bytes_stream();
        loop {
            let chunk = tokio::select! {
                chunk = stream.next() => chunk,
                () = self.cancel.cancelled() => {
                    if let Some(pb) = &progress_bar {
                        pb.abandon_with_message("interrupted");
                    }
                    return Err(NetworkError::Interrupted.into());
                }
            };
            let Some(chunk) = chunk else { break };
            let chunk = chunk.map_err(NetworkError::Reqwest)?;
            file.write_all(&chunk)
                .await
                .map_err(|e| failed(format!("failed to write {}: {e}", partial.display())))?;
            if let Some(pb) = &progress_bar {
                pb.inc(chunk.len() as u64);
            }
        }

        file.flush()
            .await
            .map_err(|e| failed(format!("failed to flush {}: {e}", partial.display())))?;
        drop(file);

        tokio::fs::rename(&partial, output).await.map_err(|e| {
            failed(format!(
                "failed to move {} to {}: {e}",
                partial.display(),
                output.display()
            ))
        })?;
        guard.keep();

        if let Some(pb) = progress_bar {
            pb.finish_and_clear();
        }
        debug!(url = %url, file = %output.display(), "download complete");
        Ok(())
    }
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".part");
    output.with_file_name(name)
}
