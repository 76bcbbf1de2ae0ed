// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Packaging of the built library.
//!
//! ```text
//! quiche/bazel-bin/quiche/libmoqt.a            -> moqt/lib/libmoqt.a  (moqt.lib on Windows)
//! quiche/quiche/**/*.h                         -> moqt/include/quiche
//! quiche/bazel-quiche/external/abseil-cpp*/absl/**/{*.h,*.inc}
//!                                              -> moqt/include/absl
//! ```
//!
//! Expects a completed build; it does not run bazel itself.
//!
//! The package ships a single archive, so `quiche.bazel_target` must name a
//! target whose archive bundles its transitive dependencies (a
//! `cc_static_library`). Consumers and the smoke test link only that
//! archive.

use std::path::PathBuf;

use anyhow::Context;
use futures_util::future::BoxFuture;
use tracing::{info, warn};

use crate::error::{FsError, Result};
use crate::platform::Platform;
use crate::task::helpers::{find_single, install_file};
use crate::task::tools::Tool;
use crate::task::tools::sync::{SyncBackend, SyncTool};
use crate::task::{TaskContext, Taskable};

const ABSEIL_PATTERN: &str = "abseil-cpp*";

#[derive(Debug, Clone, Default)]
pub struct PackageTask;

impl PackageTask {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// File name of the static library bazel produces on `host`.
    #[must_use]
    pub fn library_name(host: &Platform) -> &'static str {
        if host.is_windows() { "moqt.lib" } else { "libmoqt.a" }
    }

    /// Path of the built library inside the checkout.
    #[must_use]
    pub fn built_library(ctx: &TaskContext) -> PathBuf {
        ctx.layout()
            .quiche_dir()
            .join("bazel-bin")
            .join("quiche")
            .join(Self::library_name(&ctx.target().platforms.build))
    }

    async fn package(&self, ctx: &TaskContext) -> Result<()> {
        let layout = ctx.layout();
        let host = &ctx.target().platforms.build;
        let quiche_dir = layout.quiche_dir();
        let include_dir = layout.moqt_include_dir();
        let backend = SyncBackend::for_host(host.is_windows());
        let tool_ctx = ctx.tool_context();

        info!(package = %layout.moqt_package_dir().display(), "Packaging moqt");

        let library = Self::built_library(ctx);
        if !ctx.is_dry_run() && !library.is_file() {
            return Err(FsError::NotFound(library.display().to_string()))
                .context("moqt library is missing, run `build` first");
        }
        install_file(
            ctx,
            &library,
            &layout.moqt_lib_dir().join(Self::library_name(host)),
        )
        .await?;

        SyncTool::new(quiche_dir.join("quiche"), include_dir.join("quiche"))
            .include("*.h")
            .backend(backend)
            .run(&tool_ctx)
            .await?;

        let external = quiche_dir.join("bazel-quiche").join("external");
        let abseil = match find_single(&external, ABSEIL_PATTERN, "abseil-cpp").await {
            Ok(dir) => dir,
            Err(e) if ctx.is_dry_run() => {
                warn!(error = %e, "[dry-run] abseil-cpp headers would not be found");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        SyncTool::new(abseil.join("absl"), include_dir.join("absl"))
            .include("*.h")
            .include("*.inc")
            .backend(backend)
            .run(&tool_ctx)
            .await?;

        info!(package = %layout.moqt_package_dir().display(), "Packaged moqt");
        Ok(())
    }
}

impl Taskable for PackageTask {
    fn name(&self) -> &'static str {
        "package"
    }

    fn do_clean<'a>(&'a self, _ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async { Ok(()) })
    }

    fn do_fetch<'a>(&'a self, _ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async { Ok(()) })
    }

    fn do_build_and_install<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.package(ctx))
    }
}
