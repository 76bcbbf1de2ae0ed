// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task execution system.
//!
//! # Architecture
//!
//! ```text
//! TaskManager
//!      |
//!      v
//!   Task enum ----> TaskContext (config, target, layout, env, cancel token)
//!      |
//!      v
//!    Phases
//!   /  |   \
//!  v   v    v
//! Clean Fetch Build+Install
//!                  |
//!                  v
//!               Tools
//!      git, bazel, rsync, c++ ..
//!
//! Task variants: Bazelisk, Quiche, Bazel, Package, NativeTest
//! ```
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`TaskManager`](manager::TaskManager) | Runs tasks in order with cancellation |
//! | [`Task`] | Enum dispatching to concrete task implementations |
//! | [`Taskable`] | Trait defining the common task interface |
//! | [`Phase`] | Three-phase lifecycle: Clean → Fetch → `BuildAndInstall` |
//! | [`CleanFlags`] | Bitflags controlling what to clean |
//! | [`TaskContext`] | Execution context shared by all tasks of a run |
//!
//! ## Adding a New Task
//!
//! 1. Create the task struct in `tasks/` module
//! 2. Implement `Taskable` for the struct
//! 3. Add a variant to the `Task` enum
//! 4. Add the variant name to `impl_taskable_for_task!` invocation

pub mod helpers;
pub mod manager;
pub mod tasks;
pub mod tools;

use std::sync::Arc;

use bitflags::bitflags;
use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::config::paths::PathKey;
use crate::config::types::Configuration;
use crate::core::env::container::Env;
use crate::core::env::current_env;
use crate::deps::Deps;
use crate::error::{Result, TaskError};
use crate::layout::Layout;
use crate::platform::BuildPlatforms;
use crate::task::tools::ToolContext;

use tasks::bazel::BazelBuildTask;
use tasks::bazelisk::BazeliskTask;
use tasks::native_test::NativeTestTask;
use tasks::package::PackageTask;
use tasks::quiche::QuicheTask;

/// Task execution phase, run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Remove downloads, checkouts or build outputs, per `CleanFlags`.
    Clean,

    /// Download tools and check out sources.
    Fetch,

    /// Compile, package, or test.
    BuildAndInstall,
}

impl Phase {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Clean, Self::Fetch, Self::BuildAndInstall]
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Fetch => "fetch",
            Self::BuildAndInstall => "build_and_install",
        }
    }
}

/// Controls which task phases are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseControl {
    do_clean: bool,
    do_fetch: bool,
    do_build: bool,
}

impl Default for PhaseControl {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseControl {
    /// Fetch and build enabled; clean only runs when asked for.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            do_clean: false,
            do_fetch: true,
            do_build: true,
        }
    }

    #[must_use]
    pub const fn with_clean(mut self, enable: bool) -> Self {
        self.do_clean = enable;
        self
    }

    #[must_use]
    pub const fn with_fetch(mut self, enable: bool) -> Self {
        self.do_fetch = enable;
        self
    }

    #[must_use]
    pub const fn with_build(mut self, enable: bool) -> Self {
        self.do_build = enable;
        self
    }

    #[must_use]
    pub const fn do_clean(&self) -> bool {
        self.do_clean
    }

    #[must_use]
    pub const fn do_fetch(&self) -> bool {
        self.do_fetch
    }

    #[must_use]
    pub const fn do_build(&self) -> bool {
        self.do_build
    }
}

bitflags! {
    /// What the Clean phase removes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CleanFlags: u8 {
        /// Re-download tools (bazelisk).
        const REDOWNLOAD = 0x01;

        /// Re-fetch source checkouts (quiche).
        const REEXTRACT = 0x02;

        /// Discard build outputs (`bazelisk clean`).
        const REBUILD = 0x04;
    }
}

/// Interface shared by all tasks.
///
/// Methods return `BoxFuture` so the `Task` enum can dispatch without
/// `async_trait`.
pub trait Taskable {
    fn name(&self) -> &str;

    /// Whether this task runs in the given context. Defaults to `true`.
    fn enabled(&self, _ctx: &TaskContext) -> bool {
        true
    }

    /// Clean phase; flags come from `ctx.clean_flags()`.
    fn do_clean<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>>;

    fn do_fetch<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>>;

    fn do_build_and_install<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>>;
}

/// The target being built: which platforms, which configuration, where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub platforms: BuildPlatforms,
    pub configuration: Configuration,
    pub layout: Layout,
}

impl BuildTarget {
    /// Resolves the directory layout for `platforms` and `configuration`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured paths have not been resolved.
    pub fn new(config: &Config, platforms: BuildPlatforms, configuration: Configuration) -> Result<Self> {
        let layout = Layout::new(&config.paths, &platforms.target, configuration)?;
        Ok(Self {
            platforms,
            configuration,
            layout,
        })
    }
}

/// Context provided to tasks during execution.
#[derive(Debug, Clone)]
pub struct TaskContext {
    config: Arc<Config>,
    target: Arc<BuildTarget>,
    cancel_token: CancellationToken,
    dry_run: bool,
    clean_flags: CleanFlags,
    phases: PhaseControl,
    /// Environment for external tools: the driver's own, with the bazelisk
    /// directory in front of `PATH`.
    env: Env,
}

impl TaskContext {
    #[must_use]
    pub fn new(config: Arc<Config>, target: Arc<BuildTarget>, cancel_token: CancellationToken) -> Self {
        let mut env = current_env();
        env.prepend_path(target.layout.bazelisk_dir());
        Self {
            config,
            target,
            cancel_token,
            dry_run: false,
            clean_flags: CleanFlags::empty(),
            phases: PhaseControl::new(),
            env,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Arc<Config> {
        &self.config
    }

    #[must_use]
    pub fn target(&self) -> &BuildTarget {
        &self.target
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.target.layout
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
    pub const fn clean_flags(&self) -> CleanFlags {
        self.clean_flags
    }

    #[must_use]
    pub const fn phases(&self) -> PhaseControl {
        self.phases
    }

    #[must_use]
    pub const fn env(&self) -> &Env {
        &self.env
    }

    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub const fn with_clean_flags(mut self, flags: CleanFlags) -> Self {
        self.clean_flags = flags;
        self
    }

    #[must_use]
    pub const fn with_phases(mut self, phases: PhaseControl) -> Self {
        self.phases = phases;
        self
    }

    /// Replaces the tool environment.
    #[must_use]
    pub fn with_env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Reads the pinned versions from the DEPS file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub async fn deps(&self) -> Result<Deps> {
        Deps::load(self.config.paths.get(PathKey::DepsFile)?).await
    }

    /// Creates a `ToolContext` sharing this context's environment.
    #[must_use]
    pub fn tool_context(&self) -> ToolContext {
        ToolContext::new(
            Arc::clone(&self.config),
            self.cancel_token.clone(),
            self.dry_run,
        )
        .with_env(self.env.clone())
    }

    fn ensure_running(&self, task: &str, phase: Phase) -> Result<()> {
        if self.is_cancelled() {
            tracing::warn!(task, phase = phase.name(), "interrupted");
            return Err(TaskError::Interrupted(task.to_string()).into());
        }
        Ok(())
    }
}

/// A build task.
#[derive(Debug, Clone)]
pub enum Task {
    /// Install the pinned bazelisk.
    Bazelisk(BazeliskTask),
    /// Check out the pinned quiche commit.
    Quiche(QuicheTask),
    /// Build the MOQT library with bazel.
    Bazel(BazelBuildTask),
    /// Collect the library and headers into the package.
    Package(PackageTask),
    /// Compile and run the smoke test against the package.
    NativeTest(NativeTestTask),
}

impl Task {
    /// Runs the task through the enabled phases, checking for cancellation
    /// between them.
    ///
    /// # Errors
    ///
    /// Returns an error if a phase fails or the run is interrupted.
    pub async fn run(&self, ctx: &TaskContext) -> Result<()> {
        let name = Taskable::name(self);
        if !Taskable::enabled(self, ctx) {
            tracing::debug!(task = %name, "Skipping disabled task");
            return Ok(());
        }

        if ctx.phases().do_clean() && !ctx.clean_flags().is_empty() {
            ctx.ensure_running(name, Phase::Clean)?;
            Taskable::do_clean(self, ctx).await?;
        }

        if ctx.phases().do_fetch() {
            ctx.ensure_running(name, Phase::Fetch)?;
            Taskable::do_fetch(self, ctx).await?;
        }

        if ctx.phases().do_build() {
            ctx.ensure_running(name, Phase::BuildAndInstall)?;
            Taskable::do_build_and_install(self, ctx).await?;
        }

        Ok(())
    }
}

macro_rules! impl_taskable_for_task {
    ($($variant:ident),+ $(,)?) => {
        impl Taskable for Task {
            fn name(&self) -> &str {
                match self {
                    $(Task::$variant(t) => Taskable::name(t),)+
                }
            }

            fn enabled(&self, ctx: &TaskContext) -> bool {
                match self {
                    $(Task::$variant(t) => Taskable::enabled(t, ctx),)+
                }
            }

            fn do_clean<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
                match self {
                    $(Task::$variant(t) => Taskable::do_clean(t, ctx),)+
                }
            }

            fn do_fetch<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
                match self {
                    $(Task::$variant(t) => Taskable::do_fetch(t, ctx),)+
                }
            }

            fn do_build_and_install<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
                match self {
                    $(Task::$variant(t) => Taskable::do_build_and_install(t, ctx),)+
                }
            }
        }
    };
}

impl_taskable_for_task!(Bazelisk, Quiche, Bazel, Package, NativeTest);

#[cfg(test)]
pub(crate) mod test_utils;
