// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pinned dependency versions.
//!
//! ```text
//! DEPS
//!   # comment
//!   BAZELISK_VERSION=1.25.0
//!   QUICHE_VERSION=0123abcd...
//!        |
//!   Deps::load() --> BTreeMap<KEY, VALUE>
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::{ConfigError, Result};

pub const BAZELISK_VERSION: &str = "BAZELISK_VERSION";
pub const QUICHE_VERSION: &str = "QUICHE_VERSION";

/// Key/value pairs read from a DEPS file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deps {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl Deps {
    /// Reads and parses the DEPS file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains a malformed line.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read DEPS file {}", path.display()))?;
        Ok(Self::parse(&content, path)?)
    }

    /// Parses DEPS content; `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` naming the first line that is not
    /// blank, a `#` comment, or `KEY=VALUE`.
    pub fn parse(content: &str, path: &Path) -> std::result::Result<Self, ConfigError> {
        let mut entries = BTreeMap::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parsed = line
                .split_once('=')
                .map(|(k, v)| (k.trim(), v.trim()))
                .filter(|(k, _)| !k.is_empty());
            let Some((key, value)) = parsed else {
                return Err(ConfigError::ParseError {
                    path: path.display().to_string(),
                    message: format!("line {}: expected KEY=VALUE, got '{line}'", index + 1),
                });
            };
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Returns the value of `key`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` if the key is absent.
    pub fn get(&self, key: &str) -> std::result::Result<&str, ConfigError> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingKey {
                section: self.path.display().to_string(),
                key: key.to_string(),
            })
    }

    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` if `BAZELISK_VERSION` is absent.
    pub fn bazelisk_version(&self) -> std::result::Result<&str, ConfigError> {
        self.get(BAZELISK_VERSION)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` if `QUICHE_VERSION` is absent.
    pub fn quiche_version(&self) -> std::result::Result<&str, ConfigError> {
        self.get(QUICHE_VERSION)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
