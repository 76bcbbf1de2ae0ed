// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task manager for orchestrating task execution.
//!
//! ```text
//! TaskManager::new(config, target)
//!   .with_cancel_token()  .with_dry_run()  .with_clean_flags()
//!   .add(task) ..
//!   .run_all().await
//!       per task: Clean --> Fetch --> Build
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::{Result, TaskError};

use super::{BuildTarget, CleanFlags, PhaseControl, Task, TaskContext, Taskable};

/// Runs tasks sequentially, in the order they were added.
pub struct TaskManager {
    tasks: Vec<Task>,
    cancel_token: CancellationToken,
    config: Arc<Config>,
    target: Arc<BuildTarget>,
    dry_run: bool,
    clean_flags: CleanFlags,
    phases: PhaseControl,
}

impl TaskManager {
    #[must_use]
    pub fn new(config: Arc<Config>, target: BuildTarget) -> Self {
        Self {
            tasks: Vec::new(),
            cancel_token: CancellationToken::new(),
            config,
            target: Arc::new(target),
            dry_run: false,
            clean_flags: CleanFlags::empty(),
            phases: PhaseControl::new(),
        }
    }

    /// Shares an externally owned token, e.g. one cancelled on Ctrl-C.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets clean flags; a non-empty set also enables the clean phase.
    #[must_use]
    pub const fn with_clean_flags(mut self, flags: CleanFlags) -> Self {
        self.clean_flags = flags;
        if !flags.is_empty() {
            self.phases = self.phases.with_clean(true);
        }
        self
    }

    #[must_use]
    pub const fn with_phases(mut self, phases: PhaseControl) -> Self {
        self.phases = phases;
        self
    }

    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    #[must_use]
    pub fn with_task(mut self, task: Task) -> Self {
        self.add(task);
        self
    }

    #[must_use]
    pub const fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Names of the queued tasks, in run order.
    #[must_use]
    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(Taskable::name).collect()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
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
    pub const fn phases(&self) -> &PhaseControl {
        &self.phases
    }

    /// Signals all running tasks to stop.
    pub fn interrupt_all(&self) {
        tracing::info!("Interrupting all tasks");
        self.cancel_token.cancel();
    }

    /// Creates the context shared by every task of this run.
    #[must_use]
    pub fn create_context(&self) -> TaskContext {
        TaskContext::new(
            Arc::clone(&self.config),
            Arc::clone(&self.target),
            self.cancel_token.clone(),
        )
        .with_dry_run(self.dry_run)
        .with_clean_flags(self.clean_flags)
        .with_phases(self.phases)
    }

    /// Runs all tasks, checking for cancellation between them.
    ///
    /// # Errors
    ///
    /// Returns an error if any task fails or if cancellation is requested.
    pub async fn run_all(&self) -> Result<()> {
        self.run_with(&self.create_context()).await
    }

    /// Like [`TaskManager::run_all`] with a caller-supplied context.
    ///
    /// # Errors
    ///
    /// Returns an error if any task fails or if cancellation is requested.
    pub async fn run_with(&self, ctx: &TaskContext) -> Result<()> {
        if self.tasks.is_empty() {
            tracing::debug!("No tasks to run");
            return Ok(());
        }

        tracing::info!(
            target = %self.target.platforms.target,
            configuration = %self.target.configuration,
            task_count = self.tasks.len(),
            "Starting task execution"
        );

        for (i, task) in self.tasks.iter().enumerate() {
            if ctx.is_cancelled() {
                return Err(TaskError::Interrupted(task.name().to_string()).into());
            }

            tracing::info!(
                task = %task.name(),
                index = i + 1,
                total = self.tasks.len(),
                "Running task"
            );

            task.run(ctx)
                .await
                .with_context(|| format!("Task '{}' failed", task.name()))?;
        }

        tracing::info!("All tasks completed successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
