// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bazelisk installation.
//!
//! ```text
//! DEPS: BAZELISK_VERSION
//!   _install/<pkg>/<cfg>/bazelisk.version == version && binary present -> skip
//!   else: rm bazelisk/ -> download bazelisk-<asset> -> chmod +x -> write version
//! Clean (REDOWNLOAD): rm bazelisk/ and bazelisk.version
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use futures_util::future::BoxFuture;
use tracing::{debug, info};

use crate::error::Result;
use crate::task::helpers::{ensure_dir, remove_path};
use crate::task::tools::Tool;
use crate::task::tools::downloader::DownloaderTool;
use crate::task::{CleanFlags, TaskContext, Taskable};

#[derive(Debug, Clone, Default)]
pub struct BazeliskTask;

impl BazeliskTask {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Path of the installed executable for the build host.
    #[must_use]
    pub fn executable(ctx: &TaskContext) -> PathBuf {
        ctx.layout()
            .bazelisk_dir()
            .join(ctx.target().platforms.build.executable_name("bazelisk"))
    }

    async fn installed_version(version_file: &Path) -> Option<String> {
        tokio::fs::read_to_string(version_file)
            .await
            .ok()
            .map(|s| s.trim().to_string())
    }

    async fn clean(&self, ctx: &TaskContext) -> Result<()> {
        if !ctx.clean_flags().contains(CleanFlags::REDOWNLOAD) {
            return Ok(());
        }
        let layout = ctx.layout();
        remove_path(ctx, &layout.bazelisk_dir(), "bazelisk").await?;
        remove_path(ctx, &layout.bazelisk_version_file(), "bazelisk version file").await
    }

    async fn install(&self, ctx: &TaskContext) -> Result<()> {
        let deps = ctx.deps().await?;
        let version = deps.bazelisk_version()?;
        let layout = ctx.layout();
        let version_file = layout.bazelisk_version_file();
        let exe = Self::executable(ctx);

        if exe.exists() && Self::installed_version(&version_file).await.as_deref() == Some(version) {
            debug!(version, path = %exe.display(), "bazelisk is up to date");
            return Ok(());
        }

        let asset = ctx.target().platforms.build.bazelisk_asset()?;
        let url = ctx.config().bazelisk.url_for(version, asset);
        info!(version, asset, "Installing bazelisk");

        remove_path(ctx, &layout.bazelisk_dir(), "bazelisk").await?;
        ensure_dir(ctx, &layout.bazelisk_dir(), "bazelisk directory").await?;

        DownloaderTool::new()
            .url(url)
            .file(&exe)
            .force(true)
            .run(&ctx.tool_context())
            .await?;

        if ctx.is_dry_run() {
            info!(path = %version_file.display(), version, "[dry-run] Would write version file");
            return Ok(());
        }

        make_executable(&exe).await?;
        tokio::fs::write(&version_file, version)
            .await
            .with_context(|| format!("failed to write {}", version_file.display()))?;
        Ok(())
    }
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .with_context(|| format!("failed to make {} executable", path.display()))
}

#[cfg(not(unix))]
#[allow(clippy::unused_async)]
async fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

impl Taskable for BazeliskTask {
    fn name(&self) -> &'static str {
        "bazelisk"
    }

    fn do_clean<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.clean(ctx))
    }

    fn do_fetch<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.install(ctx))
    }

    fn do_build_and_install<'a>(&'a self, _ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests;
