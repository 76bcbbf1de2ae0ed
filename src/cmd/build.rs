// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build, package and test command implementations.
//!
//! ```text
//! build   create dirs --> bazelisk --> quiche --> bazel
//! package                                        package
//! test                                           native-test
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::cli::build::{BuildArgs, TargetArgs};
use crate::config::Config;
use crate::error::Result;
use crate::platform::{BuildPlatforms, detect_host};
use crate::task::manager::TaskManager;
use crate::task::tasks::bazel::BazelBuildTask;
use crate::task::tasks::bazelisk::BazeliskTask;
use crate::task::tasks::native_test::NativeTestTask;
use crate::task::tasks::package::PackageTask;
use crate::task::tasks::quiche::QuicheTask;
use crate::task::{BuildTarget, CleanFlags, Task};

/// Main handler for build command.
///
/// # Errors
///
/// Returns an error if the host cannot build the target, a directory cannot
/// be created, or a task fails.
pub async fn run_build_command(args: &BuildArgs, config: &Config) -> Result<()> {
    let config = Arc::new(config.clone());
    let dry_run = config.global.dry;
    let target = resolve_build_target(&config, &args.target).await?;

    target.layout.create_dirs(dry_run).await?;

    let manager = TaskManager::new(Arc::clone(&config), target)
        .with_dry_run(dry_run)
        .with_clean_flags(compute_clean_flags(args))
        .with_task(Task::Bazelisk(BazeliskTask::new()))
        .with_task(Task::Quiche(QuicheTask::new()))
        .with_task(Task::Bazel(BazelBuildTask::new()));

    run_manager(&manager, "Build").await
}

/// Main handler for package command.
///
/// # Errors
///
/// Returns an error if the host cannot build the target, the build output is
/// missing, or copying fails.
pub async fn run_package_command(args: &TargetArgs, config: &Config) -> Result<()> {
    let config = Arc::new(config.clone());
    let target = resolve_build_target(&config, args).await?;

    let manager = TaskManager::new(Arc::clone(&config), target)
        .with_dry_run(config.global.dry)
        .with_task(Task::Package(PackageTask::new()));

    run_manager(&manager, "Package").await
}

/// Main handler for test command.
///
/// # Errors
///
/// Returns an error if the package is missing, the smoke test does not
/// compile, or it exits with a non-zero code.
pub async fn run_test_command(args: &TargetArgs, config: &Config) -> Result<()> {
    let config = Arc::new(config.clone());
    let target = resolve_build_target(&config, args).await?;

    let manager = TaskManager::new(Arc::clone(&config), target)
        .with_dry_run(config.global.dry)
        .with_task(Task::NativeTest(NativeTestTask::new()));

    run_manager(&manager, "Test").await
}

/// Maps the build flags to what the clean phase removes.
#[must_use]
pub fn compute_clean_flags(args: &BuildArgs) -> CleanFlags {
    let mut clean_flags = CleanFlags::empty();
    if args.redownload || args.new_build {
        clean_flags |= CleanFlags::REDOWNLOAD;
    }
    if args.reextract || args.new_build {
        clean_flags |= CleanFlags::REEXTRACT;
    }
    if args.rebuild || args.new_build {
        clean_flags |= CleanFlags::REBUILD;
    }
    clean_flags
}

/// Detects the host and pairs it with the requested target.
pub(crate) async fn resolve_build_target(config: &Config, args: &TargetArgs) -> Result<BuildTarget> {
    let host = detect_host().await?;
    let platforms = BuildPlatforms::new(args.target, host)?;
    info!(
        target = %platforms.target,
        host = %platforms.build,
        configuration = %args.configuration(),
        "Resolved build target"
    );
    BuildTarget::new(config, platforms, args.configuration())
        .context("failed to resolve output layout")
}

async fn run_manager(manager: &TaskManager, what: &str) -> Result<()> {
    let cancel_token = manager.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, interrupting tasks...");
            cancel_token.cancel();
        }
    });

    manager.run_all().await?;
    info!("{what} completed successfully");
    Ok(())
}
