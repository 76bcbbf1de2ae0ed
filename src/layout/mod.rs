// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-target directory layout.
//!
//! ```text
//! <root>/
//!   _source/<pkg>/<cfg>/quiche/          git checkout
//!   _build/<pkg>/<cfg>/test/moqt_test    smoke test binary
//!   _install/<pkg>/<cfg>/bazelisk/       bazelisk binary
//!   _install/<pkg>/<cfg>/bazelisk.version
//!   _package/<pkg>/<cfg>/moqt/{lib,include}
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use crate::config::paths::{PathKey, PathsConfig};
use crate::config::types::Configuration;
use crate::error::Result;
use crate::platform::Platform;

/// Resolved directories for one target and configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    source_dir: PathBuf,
    build_dir: PathBuf,
    install_dir: PathBuf,
    package_dir: PathBuf,
}

impl Layout {
    /// Builds the layout from resolved paths.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` if the paths were not resolved.
    pub fn new(paths: &PathsConfig, target: &Platform, configuration: Configuration) -> Result<Self> {
        let leaf = |key| -> Result<PathBuf> {
            Ok(paths
                .get(key)?
                .join(target.package_name())
                .join(configuration.as_str()))
        };
        Ok(Self {
            source_dir: leaf(PathKey::Source)?,
            build_dir: leaf(PathKey::Build)?,
            install_dir: leaf(PathKey::Install)?,
            package_dir: leaf(PathKey::Package)?,
        })
    }

    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    #[must_use]
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    #[must_use]
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    #[must_use]
    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    /// The quiche checkout.
    #[must_use]
    pub fn quiche_dir(&self) -> PathBuf {
        self.source_dir.join("quiche")
    }

    /// Root of the distributable package.
    #[must_use]
    pub fn moqt_package_dir(&self) -> PathBuf {
        self.package_dir.join("moqt")
    }

    #[must_use]
    pub fn moqt_lib_dir(&self) -> PathBuf {
        self.moqt_package_dir().join("lib")
    }

    #[must_use]
    pub fn moqt_include_dir(&self) -> PathBuf {
        self.moqt_package_dir().join("include")
    }

    /// Directory holding the bazelisk binary; prepended to `PATH`.
    #[must_use]
    pub fn bazelisk_dir(&self) -> PathBuf {
        self.install_dir.join("bazelisk")
    }

    #[must_use]
    pub fn bazelisk_version_file(&self) -> PathBuf {
        self.install_dir.join("bazelisk.version")
    }

    /// Output directory of the native smoke test.
    #[must_use]
    pub fn test_dir(&self) -> PathBuf {
        self.build_dir.join("test")
    }

    /// Creates the source, build and install directories.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    pub async fn create_dirs(&self, dry_run: bool) -> Result<()> {
        for dir in [&self.source_dir, &self.build_dir, &self.install_dir] {
            if dry_run {
                info!(path = %dir.display(), "[dry-run] Would create directory");
                continue;
            }
            debug!(path = %dir.display(), "creating directory");
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }
}
