// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Native smoke test against the package.
//!
//! ```text
//! c++ test/main.cpp -I moqt/include -L moqt/lib -lmoqt -> _build/<pkg>/<cfg>/test/moqt_test
//! ./moqt_test (non-zero exit fails)
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use futures_util::future::BoxFuture;
use tracing::info;

use crate::config::paths::PathKey;
use crate::core::process::builder::ProcessBuilder;
use crate::error::{FsError, Result};
use crate::task::tools::Tool;
use crate::task::tools::compiler::CompilerTool;
use crate::task::{TaskContext, Taskable};

#[derive(Debug, Clone, Default)]
pub struct NativeTestTask;

impl NativeTestTask {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Path of the compiled test binary.
    #[must_use]
    pub fn binary(ctx: &TaskContext) -> PathBuf {
        ctx.layout()
            .test_dir()
            .join(ctx.target().platforms.build.executable_name("moqt_test"))
    }

    /// The compile step for `source` against this context's package.
    #[must_use]
    pub fn compiler(ctx: &TaskContext, source: &Path) -> CompilerTool {
        let layout = ctx.layout();
        CompilerTool::new(source, Self::binary(ctx))
            .include_dir(layout.moqt_include_dir())
            .lib_dir(layout.moqt_lib_dir())
            .link("moqt")
    }

    async fn test(&self, ctx: &TaskContext) -> Result<()> {
        let package = ctx.layout().moqt_package_dir();
        if !ctx.is_dry_run() && !package.is_dir() {
            return Err(FsError::NotFound(package.display().to_string()))
                .context("moqt package is missing, run `package` first");
        }

        let source = ctx.config().paths.get(PathKey::TestSource)?;
        let tool_ctx = ctx.tool_context();
        Self::compiler(ctx, source).run(&tool_ctx).await?;

        let binary = Self::binary(ctx);
        info!(binary = %binary.display(), "Running native tests");
        let runner = ProcessBuilder::new(&binary)
            .cwd(ctx.layout().test_dir())
            .env(ctx.env().clone());
        tool_ctx
            .run(runner)
            .await
            .with_context(|| format!("native tests failed ({})", binary.display()))?;

        info!("Native tests passed");
        Ok(())
    }
}

impl Taskable for NativeTestTask {
    fn name(&self) -> &'static str {
        "native-test"
    }

    fn do_clean<'a>(&'a self, _ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async { Ok(()) })
    }

    fn do_fetch<'a>(&'a self, _ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async { Ok(()) })
    }

    fn do_build_and_install<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.test(ctx))
    }
}
