// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the task system.
//!
//! Drives the full build pipeline through `TaskManager` in dry-run mode.
//! Unit tests for `Phase`, `CleanFlags`, etc. are in `src/task/tests.rs`.

use std::path::Path;
use std::sync::Arc;

use moqt_build::config::Config;
use moqt_build::config::types::Configuration;
use moqt_build::platform::{Arch, BuildPlatforms, Os, Platform, Target};
use moqt_build::task::manager::TaskManager;
use moqt_build::task::tasks::bazel::BazelBuildTask;
use moqt_build::task::tasks::bazelisk::BazeliskTask;
use moqt_build::task::tasks::package::PackageTask;
use moqt_build::task::tasks::quiche::QuicheTask;
use moqt_build::task::{BuildTarget, CleanFlags, Task};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn project() -> (TempDir, Arc<Config>) {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(
        temp.path().join("DEPS"),
        "# pinned\nBAZELISK_VERSION=1.26.0\nQUICHE_VERSION=0123abcd\n",
    )
    .unwrap();
    let mut config = Config::default();
    config.paths.root = Some(temp.path().to_path_buf());
    config.paths.resolve().unwrap();
    (temp, Arc::new(config))
}

fn ubuntu_target(config: &Config, configuration: Configuration) -> BuildTarget {
    let host = Platform::new(Os::Ubuntu, Some("24.04"), Some(Arch::X86_64));
    let platforms = BuildPlatforms::new(Target::Ubuntu2404X86_64, host).unwrap();
    BuildTarget::new(config, platforms, configuration).unwrap()
}

fn build_manager(config: &Arc<Config>, configuration: Configuration) -> TaskManager {
    TaskManager::new(Arc::clone(config), ubuntu_target(config, configuration))
        .with_task(Task::Bazelisk(BazeliskTask::new()))
        .with_task(Task::Quiche(QuicheTask::new()))
        .with_task(Task::Bazel(BazelBuildTask::new()))
}

fn entries(root: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_layout_follows_target_and_configuration() {
    let (temp, config) = project();
    let target = ubuntu_target(&config, Configuration::Debug);

    assert_eq!(
        target.layout.quiche_dir(),
        temp.path()
            .join("_source")
            .join("ubuntu-24.04_x86_64")
            .join("debug")
            .join("quiche")
    );
    assert_eq!(
        target.layout.moqt_package_dir(),
        temp.path()
            .join("_package")
            .join("ubuntu-24.04_x86_64")
            .join("debug")
            .join("moqt")
    );
}

#[tokio::test]
async fn test_dry_run_build_touches_nothing() {
    let (temp, config) = project();
    let manager = build_manager(&config, Configuration::Release)
        .with_dry_run(true)
        .with_clean_flags(CleanFlags::all());

    manager.run_all().await.unwrap();

    assert_eq!(entries(temp.path()), ["DEPS"]);
}

#[tokio::test]
async fn test_cancelled_build_stops() {
    let (_temp, config) = project();
    let token = CancellationToken::new();
    let manager = build_manager(&config, Configuration::Release)
        .with_dry_run(true)
        .with_cancel_token(token.clone());

    token.cancel();
    let err = manager.run_all().await.unwrap_err();
    assert!(format!("{err:#}").contains("interrupted"), "{err:#}");
}

#[tokio::test]
async fn test_package_without_build_fails() {
    let (_temp, config) = project();
    let manager = TaskManager::new(
        Arc::clone(&config),
        ubuntu_target(&config, Configuration::Release),
    )
    .with_task(Task::Package(PackageTask::new()));

    let err = manager.run_all().await.unwrap_err();
    let message = format!("{err:#}");
    assert!(message.starts_with("Task 'package' failed"), "{message}");
    assert!(message.contains("run `build` first"), "{message}");
}

#[tokio::test]
async fn test_missing_deps_file_fails_fetch() {
    let (temp, config) = project();
    std::fs::remove_file(temp.path().join("DEPS")).unwrap();

    let manager = TaskManager::new(
        Arc::clone(&config),
        ubuntu_target(&config, Configuration::Release),
    )
    .with_dry_run(true)
    .with_task(Task::Bazelisk(BazeliskTask::new()));

    let err = manager.run_all().await.unwrap_err();
    assert!(format!("{err:#}").contains("DEPS"), "{err:#}");
}
