// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::BazeliskTask;
use crate::platform::Target;
use crate::task::test_utils::{Fixture, relative_logs};
use crate::task::tools::test_utils::run_with_logs;
use crate::task::{CleanFlags, PhaseControl, Task};

async fn release_server(expected_downloads: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.26.0/bazelisk-linux-amd64"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"#!/bin/sh\nexit 0\n".as_slice()))
        .expect(expected_downloads)
        .mount(&server)
        .await;
    server
}

fn fixture_for(server: &MockServer) -> Fixture {
    let mut fixture = Fixture::new();
    fixture.config.bazelisk.download_url = format!("{}/v{{version}}/bazelisk-{{asset}}", server.uri());
    fixture
}

#[tokio::test]
async fn test_installs_and_records_version() {
    let server = release_server(1).await;
    let fixture = fixture_for(&server);
    let ctx = fixture.context(false);
    let task = Task::Bazelisk(BazeliskTask::new());

    task.run(&ctx).await.unwrap();

    let exe = BazeliskTask::executable(&ctx);
    assert_eq!(std::fs::read(&exe).unwrap(), b"#!/bin/sh\nexit 0\n");
    assert_eq!(
        std::fs::read_to_string(ctx.layout().bazelisk_version_file()).unwrap(),
        "1.26.0"
    );
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&exe).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    // up to date: no second download
    task.run(&ctx).await.unwrap();
}

#[tokio::test]
async fn test_version_change_reinstalls() {
    let server = release_server(1).await;
    let fixture = fixture_for(&server);
    let ctx = fixture.context(false);
    let exe = BazeliskTask::executable(&ctx);
    std::fs::create_dir_all(exe.parent().unwrap()).unwrap();
    std::fs::write(&exe, "old").unwrap();
    std::fs::write(ctx.layout().bazelisk_version_file(), "1.19.0").unwrap();

    Task::Bazelisk(BazeliskTask::new()).run(&ctx).await.unwrap();

    assert_eq!(std::fs::read(&exe).unwrap(), b"#!/bin/sh\nexit 0\n");
    assert_eq!(
        std::fs::read_to_string(ctx.layout().bazelisk_version_file()).unwrap(),
        "1.26.0"
    );
}

#[tokio::test]
async fn test_redownload_forces_reinstall() {
    let server = release_server(2).await;
    let fixture = fixture_for(&server);
    let task = Task::Bazelisk(BazeliskTask::new());

    task.run(&fixture.context(false)).await.unwrap();

    let ctx = fixture
        .context(false)
        .with_clean_flags(CleanFlags::REDOWNLOAD)
        .with_phases(PhaseControl::new().with_clean(true));
    task.run(&ctx).await.unwrap();
    assert!(BazeliskTask::executable(&ctx).exists());
}

#[tokio::test]
async fn test_clean_only_removes_install() {
    let server = release_server(1).await;
    let fixture = fixture_for(&server);
    let task = Task::Bazelisk(BazeliskTask::new());
    task.run(&fixture.context(false)).await.unwrap();

    let ctx = fixture
        .context(false)
        .with_clean_flags(CleanFlags::REDOWNLOAD)
        .with_phases(PhaseControl::new().with_clean(true).with_fetch(false).with_build(false));
    task.run(&ctx).await.unwrap();

    assert!(!ctx.layout().bazelisk_dir().exists());
    assert!(!ctx.layout().bazelisk_version_file().exists());
}

#[tokio::test]
async fn test_dry_run() {
    let fixture = Fixture::new();
    let ctx = fixture.context(true);

    let logs = run_with_logs(|| async {
        Task::Bazelisk(BazeliskTask::new()).run(&ctx).await?;
        Ok(())
    })
    .await
    .unwrap();

    let logs = relative_logs(&logs, fixture.root());
    assert!(
        logs.contains("url=https://github.com/bazelbuild/bazelisk/releases/download/v1.26.0/bazelisk-linux-amd64"),
        "{logs}"
    );
    assert!(logs.contains("[dry-run] Would write version file"), "{logs}");
    assert!(!ctx.layout().bazelisk_dir().exists());
}

#[tokio::test]
async fn test_windows_host_downloads_exe() {
    let fixture = Fixture::new().with_target(Target::WindowsX86_64);
    let ctx = fixture.context(true);
    assert!(
        BazeliskTask::executable(&ctx)
            .to_string_lossy()
            .ends_with("bazelisk.exe")
    );

    let logs = run_with_logs(|| async {
        Task::Bazelisk(BazeliskTask::new()).run(&ctx).await?;
        Ok(())
    })
    .await
    .unwrap();
    assert!(logs.contains("bazelisk-windows-amd64.exe"), "{logs}");
}

#[tokio::test]
async fn test_missing_deps_file() {
    let fixture = Fixture::new();
    std::fs::remove_file(fixture.root().join("DEPS")).unwrap();

    let err = Task::Bazelisk(BazeliskTask::new())
        .run(&fixture.context(false))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("failed to read DEPS file"), "{err:#}");
}
