// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::TaskManager;
use crate::error::TaskError;
use crate::task::tasks::bazel::BazelBuildTask;
use crate::task::tasks::bazelisk::BazeliskTask;
use crate::task::tasks::package::PackageTask;
use crate::task::tasks::quiche::QuicheTask;
use crate::task::test_utils::Fixture;
use crate::task::tools::test_utils::run_with_logs;
use crate::task::{CleanFlags, Task};

fn build_manager(fixture: &Fixture) -> TaskManager {
    TaskManager::new(Arc::new(fixture.config.clone()), fixture.build_target())
        .with_task(Task::Bazelisk(BazeliskTask::new()))
        .with_task(Task::Quiche(QuicheTask::new()))
        .with_task(Task::Bazel(BazelBuildTask::new()))
}

#[test]
fn test_task_manager_new() {
    let fixture = Fixture::new();
    let manager = build_manager(&fixture);

    assert_eq!(manager.task_names(), ["bazelisk", "quiche", "bazel"]);
    assert_eq!(manager.task_count(), 3);
    assert!(!manager.is_cancelled());
    assert!(!manager.is_dry_run());
    assert!(manager.clean_flags().is_empty());
    assert!(!manager.phases().do_clean());
}

#[test]
fn test_clean_flags_enable_clean_phase() {
    let fixture = Fixture::new();
    let manager = build_manager(&fixture)
        .with_dry_run(true)
        .with_clean_flags(CleanFlags::REEXTRACT | CleanFlags::REBUILD);

    assert!(manager.phases().do_clean());
    let ctx = manager.create_context();
    assert!(ctx.is_dry_run());
    assert_eq!(ctx.clean_flags(), CleanFlags::REEXTRACT | CleanFlags::REBUILD);
}

#[test]
fn test_context_puts_bazelisk_on_path() {
    let fixture = Fixture::new();
    let ctx = build_manager(&fixture).create_context();
    let bazelisk_dir = ctx.layout().bazelisk_dir();

    let path = ctx.env().get("PATH").unwrap_or_default();
    assert!(path.starts_with(&*bazelisk_dir.to_string_lossy()), "{path}");
}

#[test]
fn test_task_manager_interrupt() {
    let fixture = Fixture::new();
    let token = CancellationToken::new();
    let manager = build_manager(&fixture).with_cancel_token(token.clone());

    assert!(!manager.is_cancelled());
    manager.interrupt_all();
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn test_run_in_order() {
    let fixture = Fixture::new();
    let manager = build_manager(&fixture);
    let ctx = fixture.context(true);

    let logs = run_with_logs(|| async { manager.run_with(&ctx).await })
        .await
        .unwrap();

    let tasks: Vec<_> = logs
        .lines()
        .filter(|line| line.contains("Running task"))
        .filter_map(|line| line.split_whitespace().find_map(|f| f.strip_prefix("task=")))
        .collect();
    assert_eq!(tasks, ["bazelisk", "quiche", "bazel"]);
    assert!(logs.contains("All tasks completed successfully"), "{logs}");
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let fixture = Fixture::new();
    let manager = build_manager(&fixture);
    let ctx = fixture.context(true);
    ctx.cancel_token().cancel();

    let err = manager.run_with(&ctx).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TaskError>(),
        Some(TaskError::Interrupted(name)) if name == "bazelisk"
    ));
}

#[tokio::test]
async fn test_failure_names_task() {
    let fixture = Fixture::new();
    let manager = TaskManager::new(Arc::new(fixture.config.clone()), fixture.build_target())
        .with_task(Task::Package(PackageTask::new()));

    let err = manager
        .run_with(&fixture.context(false))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Task 'package' failed");
}

#[tokio::test]
async fn test_empty_manager() {
    let fixture = Fixture::new();
    TaskManager::new(Arc::new(fixture.config.clone()), fixture.build_target())
        .run_all()
        .await
        .unwrap();
}
