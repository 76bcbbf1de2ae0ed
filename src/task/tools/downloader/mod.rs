// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Downloader tool for HTTP file downloads.
//!
//! ```text
//! URLs --> HTTP GET --> progress --> local file
//! Features: fallback URLs, skip if present, force re-download, cancel
//! Uses: crate::net::Downloader + ProgressDisplay::Bar
//! ```

use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, info};

use super::{BoxFuture, Tool, ToolContext};
use crate::error::{Result, TaskError};
use crate::net::{Downloader, ProgressDisplay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloaderOperation {
    #[default]
    Download,
    Clean,
}

#[derive(Debug, Clone, Default)]
pub struct DownloaderTool {
    urls: Vec<String>,
    output_file: Option<PathBuf>,
    force: bool,
    progress: ProgressDisplay,
    operation: DownloaderOperation,
}

impl DownloaderTool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL; several URLs are tried in order.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(url.into());
        self
    }

    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Downloads even if the file already exists.
    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    #[must_use]
    pub const fn progress(mut self, progress: ProgressDisplay) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub const fn clean_op(mut self) -> Self {
        self.operation = DownloaderOperation::Clean;
        self
    }

    async fn execute_download(&self, ctx: &ToolContext) -> Result<()> {
        let output_file = self
            .output_file
            .as_ref()
            .context("no output file specified")?;

        if !self.force && output_file.exists() {
            info!(path = %output_file.display(), "file already exists, skipping download");
            return Ok(());
        }

        if self.urls.is_empty() {
            anyhow::bail!("no URLs provided for download");
        }

        let mut last_error = None;
        for (idx, url) in self.urls.iter().enumerate() {
            if ctx.is_cancelled() {
                return Err(TaskError::Interrupted("download".to_string()).into());
            }

            if ctx.is_dry_run() {
                info!(url = %url, file = %output_file.display(), "[dry-run] Would download");
                return Ok(());
            }

            debug!(url = %url, attempt = idx + 1, total = self.urls.len(), "attempting download");

            let downloader = Downloader::new()
                .url(url)
                .file(output_file)
                .progress(self.progress)
                .cancel_token(ctx.cancel_token().clone());

            match downloader.download().await {
                Ok(()) => {
                    info!(url = %url, file = %output_file.display(), "Downloaded");
                    return Ok(());
                }
                Err(e) => {
                    debug!(url = %url, error = %e, "download attempt failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e).with_context(|| format!("failed to download {}", output_file.display())),
            None => anyhow::bail!("no URLs provided for download"),
        }
    }

    async fn execute_clean(&self, ctx: &ToolContext) -> Result<()> {
        let output_file = self
            .output_file
            .as_ref()
            .context("no output file specified")?;

        if !output_file.exists() {
            debug!(file = %output_file.display(), "nothing to clean");
            return Ok(());
        }

        if ctx.is_dry_run() {
            info!(file = %output_file.display(), "[dry-run] Would delete");
            return Ok(());
        }

        tokio::fs::remove_file(output_file)
            .await
            .with_context(|| format!("failed to delete {}", output_file.display()))?;
        info!(file = %output_file.display(), "Deleted");
        Ok(())
    }
}

impl Tool for DownloaderTool {
    fn name(&self) -> &'static str {
        "downloader"
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            match self.operation {
                DownloaderOperation::Download => self.execute_download(ctx).await,
                DownloaderOperation::Clean => self.execute_clean(ctx).await,
            }
        })
    }
}
