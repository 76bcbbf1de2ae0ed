// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tool abstractions for task execution.
//!
//! ```text
//! Task --> ToolContext --> ProcessBuilder --> external tool
//!            |  env (PATH with install/bazelisk, BAZEL_VC)
//!            |  cancel token --> run_with_cancellation
//!            |  dry run --> "[dry-run] Would run ..."
//!   GitTool, BazelTool, SyncTool, CompilerTool, DownloaderTool
//! ```

use std::path::Path;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Config;
use crate::core::env::container::Env;
use crate::core::process::builder::{ProcessBuilder, ProcessOutput};
use crate::error::{ProcessError, Result, TaskError};

pub mod bazel;
pub mod compiler;
pub mod downloader;
pub mod git;
pub mod sync;

/// Context provided to tools during execution.
#[derive(Debug, Clone)]
pub struct ToolContext {
    config: Arc<Config>,
    cancel_token: CancellationToken,
    dry_run: bool,
    /// Environment for spawned tools; `None` inherits the driver's.
    env: Option<Env>,
}

impl ToolContext {
    #[must_use]
    pub const fn new(config: Arc<Config>, cancel_token: CancellationToken, dry_run: bool) -> Self {
        Self {
            config,
            cancel_token,
            dry_run,
            env: None,
        }
    }

    #[must_use]
    pub fn with_env(mut self, env: Env) -> Self {
        self.env = Some(env);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &Arc<Config> {
        &self.config
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    #[must_use]
    pub const fn env(&self) -> Option<&Env> {
        self.env.as_ref()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Locates a tool: the configured path if set, else `default` on the
    /// `PATH` of this context's environment.
    ///
    /// A dry run falls back to the bare name, since tools installed by
    /// earlier steps do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if the lookup fails.
    pub fn program(&self, configured: &Path, default: &str) -> Result<ProcessBuilder> {
        match self.find(configured, default) {
            Ok(builder) => Ok(builder),
            Err(e) if self.dry_run => {
                debug!(tool = default, error = %e, "tool not found, using bare name for dry run");
                Ok(ProcessBuilder::new(default).maybe_env(self.env.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`ToolContext::program`] without the dry-run fallback.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if the lookup fails.
    pub fn find(&self, configured: &Path, default: &str) -> std::result::Result<ProcessBuilder, ProcessError> {
        match &self.env {
            Some(env) => ProcessBuilder::resolve_in(configured, default, env),
            None => ProcessBuilder::resolve(configured, default),
        }
    }

    /// Runs `builder`, or only logs its command line in a dry run.
    ///
    /// # Errors
    ///
    /// Returns an error if the process fails, or `TaskError::Interrupted` if
    /// it was cancelled.
    pub async fn run(&self, builder: ProcessBuilder) -> Result<ProcessOutput> {
        if self.dry_run {
            info!(
                cwd = ?builder.working_dir().map(Path::display),
                "[dry-run] Would run '{}'",
                builder.display_command()
            );
            return Ok(ProcessOutput::default());
        }

        let name = builder.display_name();
        let output = builder
            .run_with_cancellation(self.cancel_token.clone())
            .await?;
        if output.is_interrupted() {
            return Err(TaskError::Interrupted(name).into());
        }
        Ok(output)
    }
}

/// A single external operation (git fetch, bazel build, rsync, ...).
///
/// Tools honor the context's dry-run flag and cancellation token.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>>;
}

#[cfg(test)]
pub(crate) mod test_utils;
