// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use std::time::Duration;

use super::builder::{ProcessBuilder, ProcessFlags};
use crate::core::env::container::Env;
use crate::error::ProcessError;
use tokio_util::sync::CancellationToken;

/// Runs `command` through the platform shell.
fn shell(command: &str) -> ProcessBuilder {
    if cfg!(windows) {
        ProcessBuilder::new("cmd").args(["/C", command])
    } else {
        ProcessBuilder::new("/bin/sh").args(["-c", command])
    }
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_echo() {
    let output = ProcessBuilder::new("echo")
        .arg("hello")
        .capture_output()
        .run()
        .await
        .expect("echo should succeed");

    assert!(output.success());
    insta::assert_snapshot!(output.stdout(), @"hello");
}

#[tokio::test]
async fn test_process_exit_code_allowed() {
    let output = shell("exit 42")
        .flag(ProcessFlags::ALLOW_FAILURE)
        .run()
        .await
        .expect("process should complete");

    assert_eq!(output.exit_code(), 42);
    assert!(!output.success());
}

#[tokio::test]
async fn test_process_exit_code_rejected() {
    let err = shell("exit 3")
        .name("failing")
        .run()
        .await
        .unwrap_err();

    let process_err = err.downcast_ref::<ProcessError>().unwrap();
    assert!(matches!(
        process_err,
        ProcessError::NonZeroExit { code: 3, .. }
    ));
    assert_eq!(err.to_string(), "process 'failing' exited with code 3");
}

#[tokio::test]
async fn test_process_custom_success_codes() {
    // robocopy-style: 0..=3 are success
    let output = shell("exit 2")
        .success_codes(0..=3)
        .run()
        .await
        .expect("exit code 2 should be accepted");
    assert_eq!(output.exit_code(), 2);
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_env() {
    let mut env = Env::new();
    env.set("TEST_VAR", "test_value");

    let output = shell("echo $TEST_VAR")
        .env(env)
        .capture_stdout()
        .run()
        .await
        .expect("process should succeed");

    insta::assert_snapshot!(output.stdout(), @"test_value");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_captures_many_lines() {
    let output = shell("i=0; while [ $i -lt 5000 ]; do echo line$i; i=$((i+1)); done")
        .capture_stdout()
        .run()
        .await
        .expect("process should succeed");

    let lines: Vec<_> = output.stdout().lines().collect();
    assert_eq!(lines.len(), 5000);
    assert_eq!(lines[4999], "line4999");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_cwd() {
    let temp = tempfile::tempdir().unwrap();
    let output = ProcessBuilder::new("pwd")
        .cwd(temp.path())
        .capture_stdout()
        .run()
        .await
        .unwrap();

    let reported = Path::new(output.stdout()).canonicalize().unwrap();
    assert_eq!(reported, temp.path().canonicalize().unwrap());
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_timeout() {
    let err = ProcessBuilder::new("sleep")
        .arg("10")
        .timeout(Duration::from_millis(100))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProcessError>(),
        Some(ProcessError::Timeout { .. })
    ));
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_cancellation() {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
    });

    let output = ProcessBuilder::new("sleep")
        .arg("10")
        .run_with_cancellation(token)
        .await
        .expect("interrupted process is not an error");

    assert!(output.is_interrupted());
}

#[tokio::test]
async fn test_process_already_cancelled() {
    let token = CancellationToken::new();
    token.cancel();

    let output = ProcessBuilder::new("program-that-is-never-spawned")
        .run_with_cancellation(token)
        .await
        .unwrap();
    assert!(output.is_interrupted());
}

#[tokio::test]
async fn test_process_spawn_failure() {
    let err = ProcessBuilder::new("nonexistent_program_12345")
        .run()
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ProcessError>(),
        Some(ProcessError::SpawnFailed { .. })
    ));
}

#[test]
fn test_command_line_quotes_spaces() {
    let builder = ProcessBuilder::new("bazelisk")
        .args(["build", "quiche:moqt", "-c", "opt"])
        .arg("--define=x=a b")
        .arg("");
    insta::assert_snapshot!(
        builder.command_line(),
        @r#"bazelisk build quiche:moqt -c opt "--define=x=a b" """#
    );
    assert_eq!(builder.display_name(), "bazelisk");
}

#[test]
fn test_resolve_prefers_configured_path() {
    let builder = ProcessBuilder::resolve(Path::new("/opt/bazel/bazelisk"), "bazelisk").unwrap();
    assert_eq!(builder.program(), Path::new("/opt/bazel/bazelisk"));
    assert_eq!(builder.display_name(), "bazelisk");
}

#[test]
fn test_executable_lookup_not_found() {
    let program = "nonexistent_program_12345";

    let err = ProcessBuilder::which(program).unwrap_err();
    assert!(err.to_string().contains(program), "{err}");
    assert!(!ProcessBuilder::exists(program));
    assert!(ProcessBuilder::find(program).is_none());
    assert!(ProcessBuilder::resolve(Path::new(""), program).is_err());
}

#[test]
fn test_executable_lookup_found() {
    // cargo runs the tests, so it is on PATH
    let builder = ProcessBuilder::which("cargo").expect("cargo should be in PATH");
    assert!(builder.program().exists());
    assert!(ProcessBuilder::exists("cargo"));
}

#[cfg(unix)]
#[test]
fn test_resolve_in_searches_env_path() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let tool = dir.path().join("bazelisk");
    std::fs::write(&tool, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut env = Env::new();
    env.set("PATH", dir.path().display().to_string());

    let builder = ProcessBuilder::resolve_in(Path::new(""), "bazelisk", &env).unwrap();
    assert_eq!(builder.program(), tool);
    assert_eq!(
        builder.environment().and_then(|e| e.get("PATH")),
        env.get("PATH")
    );

    let mut empty = Env::new();
    empty.set("PATH", "");
    assert!(matches!(
        ProcessBuilder::resolve_in(Path::new(""), "bazelisk", &empty),
        Err(ProcessError::ExecutableNotFound { .. })
    ));
}
