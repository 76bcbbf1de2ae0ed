// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Path configuration.
//!
//! ```text
//! root/
//!   DEPS           (deps_file)
//!   VERSION        (version_file)
//!   test/main.cpp  (test_source)
//!   _source/       (source)
//!   _build/        (build)
//!   _install/      (install)
//!   _package/      (package)
//! ```
//!
//! All paths are optional and resolved from `root` if not set. `root`
//! itself defaults to the working directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::{ConfigError, Result};

/// Repository and output directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Repository root (all other paths relative to this).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Upstream source checkouts (default: root/_source).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Build outputs (default: root/_build).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<PathBuf>,
    /// Installed tools such as bazelisk (default: root/_install).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install: Option<PathBuf>,
    /// Distributable packages (default: root/_package).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<PathBuf>,
    /// Pinned dependency versions (default: root/DEPS).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deps_file: Option<PathBuf>,
    /// Release version file (default: root/VERSION).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_file: Option<PathBuf>,
    /// Native smoke test source (default: root/test/main.cpp).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_source: Option<PathBuf>,
}

impl PathsConfig {
    /// Resolve all relative paths against `root` and fill in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is unset and the working directory cannot
    /// be determined.
    pub fn resolve(&mut self) -> Result<()> {
        let cwd = || std::env::current_dir().context("failed to get current directory");

        let root = match self.root.take() {
            Some(p) if p.is_relative() => cwd()?.join(p),
            Some(p) => p,
            None => cwd()?,
        };

        let resolve = |path: &mut Option<PathBuf>, default: &str| match path {
            Some(p) if p.is_relative() => {
                *path = Some(root.join(p.clone()));
            }
            None => {
                *path = Some(root.join(default));
            }
            _ => {}
        };

        resolve(&mut self.source, "_source");
        resolve(&mut self.build, "_build");
        resolve(&mut self.install, "_install");
        resolve(&mut self.package, "_package");
        resolve(&mut self.deps_file, "DEPS");
        resolve(&mut self.version_file, "VERSION");
        resolve(&mut self.test_source, "test/main.cpp");

        self.root = Some(root);
        Ok(())
    }

    /// Get the root path, returning an error if not resolved.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if `root` is not set.
    pub fn root(&self) -> Result<&Path> {
        Self::required(self.root.as_deref(), "root")
    }

    /// Get a resolved path by key, returning an error if not resolved.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if the path is not set.
    pub fn get(&self, key: PathKey) -> Result<&Path> {
        let path = match key {
            PathKey::Source => &self.source,
            PathKey::Build => &self.build,
            PathKey::Install => &self.install,
            PathKey::Package => &self.package,
            PathKey::DepsFile => &self.deps_file,
            PathKey::VersionFile => &self.version_file,
            PathKey::TestSource => &self.test_source,
        };
        Self::required(path.as_deref(), key.as_str())
    }

    fn required<'a>(path: Option<&'a Path>, key: &str) -> Result<&'a Path> {
        path.ok_or_else(|| {
            ConfigError::MissingKey {
                section: "paths".to_string(),
                key: key.to_string(),
            }
            .into()
        })
    }
}

/// Resolvable path entries of [`PathsConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKey {
    Source,
    Build,
    Install,
    Package,
    DepsFile,
    VersionFile,
    TestSource,
}

impl PathKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Build => "build",
            Self::Install => "install",
            Self::Package => "package",
            Self::DepsFile => "deps_file",
            Self::VersionFile => "version_file",
            Self::TestSource => "test_source",
        }
    }
}
