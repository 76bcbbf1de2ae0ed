// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task test fixtures: a resolved config rooted in a temp dir.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use super::{BuildTarget, TaskContext};
use crate::config::Config;
use crate::config::types::Configuration;
use crate::core::env::container::Env;
use crate::platform::{BuildPlatforms, Target};

pub(crate) const TEST_DEPS: &str = "BAZELISK_VERSION=1.26.0\nQUICHE_VERSION=0123abcd\n";

pub(crate) struct Fixture {
    pub temp: TempDir,
    pub config: Config,
    pub target: Target,
    pub configuration: Configuration,
}

impl Fixture {
    /// An ubuntu release build rooted in a fresh temp dir with a DEPS file.
    pub fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("DEPS"), TEST_DEPS).unwrap();
        let mut config = Config::default();
        config.paths.root = Some(temp.path().to_path_buf());
        config.paths.resolve().unwrap();
        Self {
            temp,
            config,
            target: Target::Ubuntu2404X86_64,
            configuration: Configuration::Release,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub const fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn build_target(&self) -> BuildTarget {
        let host = self.target.platform(Some("11"));
        let platforms = BuildPlatforms::new(self.target, host).unwrap();
        BuildTarget::new(&self.config, platforms, self.configuration).unwrap()
    }

    /// A context whose `PATH` only contains the bazelisk directory, so no
    /// real tools are picked up.
    pub fn context(&self, dry_run: bool) -> TaskContext {
        let target = self.build_target();
        let mut env = Env::new();
        env.set("PATH", "");
        env.prepend_path(target.layout.bazelisk_dir());
        TaskContext::new(
            Arc::new(self.config.clone()),
            Arc::new(target),
            CancellationToken::new(),
        )
        .with_dry_run(dry_run)
        .with_env(env)
    }
}

/// Strip `root` from every path in `logs`, so snapshots are stable.
pub(crate) fn relative_logs(logs: &str, root: &Path) -> String {
    let root = root.display().to_string();
    logs.lines()
        .map(|line| line.replace(&root, "<root>").replace('\\', "/"))
        .collect::<Vec<_>>()
        .join("\n")
}
