// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bazel build of the MOQT library.
//!
//! ```text
//! cd _source/<pkg>/<cfg>/quiche
//! [windows host] BAZEL_VC=<latest VS>\VC unless already set
//! bazelisk build <quiche.bazel_target> -c opt|dbg <quiche.extra_bazel_args>
//! Clean (REBUILD): bazelisk clean
//! ```

use futures_util::future::BoxFuture;
use tracing::{debug, warn};

use crate::core::env::container::Env;
use crate::core::vs;
use crate::error::Result;
use crate::task::tools::Tool;
use crate::task::tools::bazel::BazelTool;
use crate::task::{CleanFlags, TaskContext, Taskable};

const BAZEL_VC: &str = "BAZEL_VC";

#[derive(Debug, Clone, Default)]
pub struct BazelBuildTask;

impl BazelBuildTask {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The bazel invocation for this context's target and configuration.
    #[must_use]
    pub fn build_tool(ctx: &TaskContext) -> BazelTool {
        let quiche = &ctx.config().quiche;
        BazelTool::build(&quiche.bazel_target)
            .workspace(ctx.layout().quiche_dir())
            .configuration(ctx.target().configuration)
            .extra_args(quiche.extra_bazel_args.iter().cloned())
    }

    /// The tool environment, with `BAZEL_VC` pointing at the newest Visual
    /// Studio when building on Windows.
    async fn build_env(ctx: &TaskContext) -> Env {
        let mut env = ctx.env().clone();
        if !ctx.target().platforms.build.is_windows() || env.get(BAZEL_VC).is_some() {
            return env;
        }

        match vs::find_latest().await {
            Ok(installation) => {
                let vc_dir = installation.vc_dir();
                debug!(path = %vc_dir.display(), "setting {BAZEL_VC}");
                env.set(BAZEL_VC, vc_dir.to_string_lossy());
            }
            Err(e) => {
                warn!(error = %e, "no Visual Studio installation found, leaving {BAZEL_VC} unset");
            }
        }
        env
    }

    async fn clean(&self, ctx: &TaskContext) -> Result<()> {
        if !ctx.clean_flags().contains(CleanFlags::REBUILD) {
            return Ok(());
        }
        let quiche_dir = ctx.layout().quiche_dir();
        if !quiche_dir.exists() {
            debug!(path = %quiche_dir.display(), "no checkout, nothing to clean");
            return Ok(());
        }
        BazelTool::clean()
            .workspace(&quiche_dir)
            .run(&ctx.tool_context())
            .await
    }

    async fn build(&self, ctx: &TaskContext) -> Result<()> {
        let env = Self::build_env(ctx).await;
        let tool_ctx = ctx.tool_context().with_env(env);
        Self::build_tool(ctx).run(&tool_ctx).await
    }
}

impl Taskable for BazelBuildTask {
    fn name(&self) -> &'static str {
        "bazel"
    }

    fn do_clean<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.clean(ctx))
    }

    fn do_fetch<'a>(&'a self, _ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async { Ok(()) })
    }

    fn do_build_and_install<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.build(ctx))
    }
}
