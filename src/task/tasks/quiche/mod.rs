// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Quiche source checkout.
//!
//! ```text
//! DEPS: QUICHE_VERSION (commit hash)
//!   _source/<pkg>/<cfg>/quiche missing:
//!     git init
//!     git remote add origin <quiche.url>
//!     git fetch --depth=1 origin <hash>
//!     git reset --hard FETCH_HEAD
//! Clean (REEXTRACT): rm quiche/
//! ```
//!
//! An existing checkout is left alone, even if `QUICHE_VERSION` changed;
//! `--reextract` fetches it again.

use futures_util::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::task::helpers::{ensure_dir, remove_path};
use crate::task::tools::Tool;
use crate::task::tools::git::GitTool;
use crate::task::tools::sync::remove_existing;
use crate::task::{CleanFlags, TaskContext, Taskable};

const REMOTE: &str = "origin";

#[derive(Debug, Clone, Default)]
pub struct QuicheTask;

impl QuicheTask {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The git commands of a shallow checkout of `hash` from `url`.
    #[must_use]
    pub fn checkout_steps(url: &str, hash: &str) -> Vec<GitTool> {
        vec![
            GitTool::init(),
            GitTool::add_remote(REMOTE, url),
            GitTool::fetch_shallow(REMOTE, hash),
            GitTool::reset_hard("FETCH_HEAD"),
        ]
    }

    async fn clean(&self, ctx: &TaskContext) -> Result<()> {
        if ctx.clean_flags().contains(CleanFlags::REEXTRACT) {
            remove_path(ctx, &ctx.layout().quiche_dir(), "quiche checkout").await?;
        }
        Ok(())
    }

    async fn fetch(&self, ctx: &TaskContext) -> Result<()> {
        let quiche_dir = ctx.layout().quiche_dir();
        if quiche_dir.exists() {
            debug!(path = %quiche_dir.display(), "quiche already checked out");
            return Ok(());
        }

        let deps = ctx.deps().await?;
        let hash = deps.quiche_version()?;
        info!(version = hash, path = %quiche_dir.display(), "Fetching quiche");

        ensure_dir(ctx, &quiche_dir, "quiche directory").await?;
        let tool_ctx = ctx.tool_context();
        for step in Self::checkout_steps(&ctx.config().quiche.url, hash) {
            if let Err(e) = step.path(&quiche_dir).run(&tool_ctx).await {
                // a partial checkout would be skipped by the next run
                if let Err(cleanup) = remove_existing(&quiche_dir).await {
                    warn!(error = %cleanup, "failed to remove partial checkout");
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

impl Taskable for QuicheTask {
    fn name(&self) -> &'static str {
        "quiche"
    }

    fn do_clean<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.clean(ctx))
    }

    fn do_fetch<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.fetch(ctx))
    }

    fn do_build_and_install<'a>(&'a self, _ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async { Ok(()) })
    }
}
