// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::BazelTool;
use crate::config::Config;
use crate::config::types::Configuration;
use crate::core::env::container::Env;
use crate::task::tools::test_utils::run_with_logs;
use crate::task::tools::{Tool, ToolContext};

#[test]
fn test_build_args_per_configuration() {
    let release = BazelTool::build("quiche:moqt").args();
    let debug = BazelTool::build("quiche:moqt")
        .configuration(Configuration::Debug)
        .args();
    insta::assert_snapshot!(release.join(" "), @"build quiche:moqt -c opt");
    insta::assert_snapshot!(debug.join(" "), @"build quiche:moqt -c dbg");
}

#[test]
fn test_build_extra_args_follow_mode() {
    let args = BazelTool::build("quiche:moqt")
        .extra_args(["--jobs=8", "--verbose_failures"])
        .args();
    assert_eq!(
        args,
        ["build", "quiche:moqt", "-c", "opt", "--jobs=8", "--verbose_failures"]
    );
}

#[test]
fn test_clean_args() {
    assert_eq!(BazelTool::clean().extra_args(["--jobs=8"]).args(), ["clean"]);
    assert_eq!(BazelTool::clean().name(), "bazel");
}

#[tokio::test]
async fn test_workspace_required() {
    let ctx = ToolContext::new(Arc::new(Config::default()), CancellationToken::new(), true);
    let err = BazelTool::build("quiche:moqt").run(&ctx).await.unwrap_err();
    assert!(err.to_string().contains("workspace is required"));
}

#[tokio::test]
async fn test_dry_run_uses_bare_bazelisk() {
    // empty PATH: bazelisk cannot be found, which a dry run tolerates
    let mut env = Env::new();
    env.set("PATH", "");
    let ctx = ToolContext::new(Arc::new(Config::default()), CancellationToken::new(), true)
        .with_env(env);
    let tool = BazelTool::build("quiche:moqt").workspace("/src/quiche");

    let logs = run_with_logs(|| tool.run(&ctx)).await.unwrap();
    assert!(
        logs.contains("[dry-run] Would run 'bazelisk build quiche:moqt -c opt'"),
        "{logs}"
    );
}

#[tokio::test]
async fn test_missing_bazelisk_is_an_error() {
    let mut env = Env::new();
    env.set("PATH", "");
    let ctx = ToolContext::new(Arc::new(Config::default()), CancellationToken::new(), false)
        .with_env(env);
    let err = BazelTool::clean()
        .workspace("/src/quiche")
        .run(&ctx)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("bazelisk"), "{err}");
}
