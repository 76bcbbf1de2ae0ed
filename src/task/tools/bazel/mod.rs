// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bazel tool, run through bazelisk.
//!
//! ```text
//! BazelTool::build("quiche:moqt").workspace(quiche_dir)
//!   bazelisk build quiche:moqt -c opt [extra args]
//! BazelTool::clean()
//!   bazelisk clean
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use super::{BoxFuture, Tool, ToolContext};
use crate::config::types::Configuration;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BazelOperation {
    Build { target: String },
    Clean,
}

#[derive(Debug, Clone)]
pub struct BazelTool {
    workspace: Option<PathBuf>,
    configuration: Configuration,
    extra_args: Vec<String>,
    operation: BazelOperation,
}

impl BazelTool {
    #[must_use]
    pub fn build(target: impl Into<String>) -> Self {
        Self::new(BazelOperation::Build {
            target: target.into(),
        })
    }

    #[must_use]
    pub fn clean() -> Self {
        Self::new(BazelOperation::Clean)
    }

    const fn new(operation: BazelOperation) -> Self {
        Self {
            workspace: None,
            configuration: Configuration::Release,
            extra_args: Vec::new(),
            operation,
        }
    }

    /// Directory containing the bazel `WORKSPACE`/`MODULE.bazel`.
    #[must_use]
    pub fn workspace(mut self, path: impl AsRef<Path>) -> Self {
        self.workspace = Some(path.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub const fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Arguments appended after the compilation mode.
    #[must_use]
    pub fn extra_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn args(&self) -> Vec<String> {
        match &self.operation {
            BazelOperation::Build { target } => {
                let mut args = vec![
                    "build".to_string(),
                    target.clone(),
                    "-c".to_string(),
                    self.configuration.bazel_compilation_mode().to_string(),
                ];
                args.extend(self.extra_args.iter().cloned());
                args
            }
            BazelOperation::Clean => vec!["clean".to_string()],
        }
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<()> {
        let workspace = self
            .workspace
            .as_ref()
            .context("BazelTool: workspace is required")?;

        let builder = ctx
            .program(&ctx.config().tools.bazelisk, "bazelisk")?
            .args(self.args())
            .cwd(workspace);

        match &self.operation {
            BazelOperation::Build { target } => {
                info!(target = %target, mode = %self.configuration, "Building with bazel");
                ctx.run(builder)
                    .await
                    .with_context(|| format!("bazel build of {target} failed"))?;
            }
            BazelOperation::Clean => {
                info!(workspace = %workspace.display(), "Cleaning bazel outputs");
                ctx.run(builder).await.context("bazel clean failed")?;
            }
        }
        Ok(())
    }
}

impl Tool for BazelTool {
    fn name(&self) -> &'static str {
        "bazel"
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.execute(ctx))
    }
}

#[cfg(test)]
mod tests;
