// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filtered directory sync.
//!
//! ```text
//! SyncTool::new(src, dst).include("*.h").include("*.inc")
//!   remove dst
//!   windows: robocopy SRC DST *.h *.inc /S /NP /NFL /NDL   (exit >= 4 fails)
//!   others:  mkdir DST
//!            rsync -amv --include=*/ --include=*.h --include=*.inc --exclude=* SRC/. DST/.
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use super::{BoxFuture, Tool, ToolContext};
use crate::error::Result;

/// robocopy exit codes below this are success (bit flags for copied/extra files).
const ROBOCOPY_FAILURE: i32 = 4;

/// Which program performs the copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncBackend {
    Rsync,
    Robocopy,
}

impl SyncBackend {
    /// robocopy on Windows hosts, rsync elsewhere.
    #[must_use]
    pub const fn for_host(is_windows: bool) -> Self {
        if is_windows { Self::Robocopy } else { Self::Rsync }
    }

    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::Rsync => "rsync",
            Self::Robocopy => "robocopy",
        }
    }
}

/// Copies files matching include patterns from `src` into a fresh `dst`.
#[derive(Debug, Clone)]
pub struct SyncTool {
    src: PathBuf,
    dst: PathBuf,
    includes: Vec<String>,
    backend: SyncBackend,
}

impl SyncTool {
    #[must_use]
    pub fn new(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Self {
        Self {
            src: src.as_ref().to_path_buf(),
            dst: dst.as_ref().to_path_buf(),
            includes: Vec::new(),
            backend: SyncBackend::for_host(cfg!(windows)),
        }
    }

    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.includes.push(pattern.into());
        self
    }

    #[must_use]
    pub const fn backend(mut self, backend: SyncBackend) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub fn args(&self) -> Vec<String> {
        match self.backend {
            SyncBackend::Robocopy => {
                let mut args = vec![
                    self.src.display().to_string(),
                    self.dst.display().to_string(),
                ];
                args.extend(self.includes.iter().cloned());
                args.extend(["/S", "/NP", "/NFL", "/NDL"].map(String::from));
                args
            }
            SyncBackend::Rsync => {
                let mut args = vec!["-amv".to_string(), "--include=*/".to_string()];
                args.extend(self.includes.iter().map(|p| format!("--include={p}")));
                args.push("--exclude=*".to_string());
                args.push(format!("{}/.", self.src.display()));
                args.push(format!("{}/.", self.dst.display()));
                args
            }
        }
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<()> {
        let tools = &ctx.config().tools;
        let configured = match self.backend {
            SyncBackend::Rsync => &tools.rsync,
            SyncBackend::Robocopy => &tools.robocopy,
        };

        if ctx.is_dry_run() {
            info!(path = %self.dst.display(), "[dry-run] Would remove directory");
        } else {
            remove_existing(&self.dst).await?;
            if self.backend == SyncBackend::Rsync {
                tokio::fs::create_dir_all(&self.dst)
                    .await
                    .with_context(|| format!("failed to create {}", self.dst.display()))?;
            }
        }

        let mut builder = ctx
            .program(configured, self.backend.program())?
            .args(self.args());
        if self.backend == SyncBackend::Robocopy {
            builder = builder.success_codes(0..ROBOCOPY_FAILURE);
        }

        debug!(
            src = %self.src.display(),
            dst = %self.dst.display(),
            includes = ?self.includes,
            "syncing"
        );
        ctx.run(builder).await.with_context(|| {
            format!(
                "failed to sync {} to {}",
                self.src.display(),
                self.dst.display()
            )
        })?;
        Ok(())
    }
}

/// Removes a file or directory tree if present.
pub(crate) async fn remove_existing(path: &Path) -> Result<()> {
    let Ok(meta) = tokio::fs::symlink_metadata(path).await else {
        return Ok(());
    };
    let removed = if meta.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    };
    removed.with_context(|| format!("failed to remove {}", path.display()))
}

impl Tool for SyncTool {
    fn name(&self) -> &'static str {
        self.backend.program()
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.execute(ctx))
    }
}
