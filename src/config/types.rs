// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for moqt-build.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, PathsConfig, QuicheConfig, BazeliskConfig,
//!         ToolsConfig, CanaryConfig
//! ```
//!
//! # Build Configuration
//!
//! ```text
//! Configuration: Debug | Release (default)
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Build configuration of the native library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Configuration {
    Debug,
    #[default]
    Release,
}

impl Configuration {
    /// Select the configuration from a `--debug` flag.
    #[must_use]
    pub const fn from_debug_flag(debug: bool) -> Self {
        if debug { Self::Debug } else { Self::Release }
    }

    /// Directory name used in the output layout.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    /// Bazel compilation mode (`-c <mode>`).
    #[must_use]
    pub const fn bazel_compilation_mode(self) -> &'static str {
        match self {
            Self::Debug => "dbg",
            Self::Release => "opt",
        }
    }

    /// Both configurations, debug first.
    pub const ALL: [Self; 2] = [Self::Debug, Self::Release];
}

impl std::fmt::Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Configuration {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            _ => Err(ConfigError::InvalidValue {
                section: "build".to_string(),
                key: "configuration".to_string(),
                message: format!("expected 'debug' or 'release', got '{s}'"),
            }),
        }
    }
}

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Simulate filesystem operations and process launches.
    pub dry: bool,
    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Write the log file as JSON lines.
    pub log_json: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
            log_json: false,
        }
    }
}

/// Upstream quiche checkout and Bazel target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuicheConfig {
    /// Repository URL fetched at `QUICHE_VERSION`.
    pub url: String,
    /// Bazel label producing the MOQT static library.
    pub bazel_target: String,
    /// Extra arguments appended to `bazelisk build`.
    pub extra_bazel_args: Vec<String>,
}

impl Default for QuicheConfig {
    fn default() -> Self {
        Self {
            url: "https://quiche.googlesource.com/quiche".to_string(),
            bazel_target: "quiche:moqt".to_string(),
            extra_bazel_args: Vec::new(),
        }
    }
}

/// Bazelisk release download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BazeliskConfig {
    /// URL template; `{version}` and `{asset}` are substituted.
    pub download_url: String,
}

impl Default for BazeliskConfig {
    fn default() -> Self {
        Self {
            download_url:
                "https://github.com/bazelbuild/bazelisk/releases/download/v{version}/bazelisk-{asset}"
                    .to_string(),
        }
    }
}

impl BazeliskConfig {
    /// Expand the download URL for a version and release asset.
    #[must_use]
    pub fn url_for(&self, version: &str, asset: &str) -> String {
        self.download_url
            .replace("{version}", version)
            .replace("{asset}", asset)
    }
}

/// External tool executables. Empty paths are looked up on `PATH`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub git: PathBuf,
    pub bazelisk: PathBuf,
    pub rsync: PathBuf,
    pub robocopy: PathBuf,
    /// C++ compiler used for the smoke test.
    pub cxx: PathBuf,
}

/// Canary release settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanaryConfig {
    /// Sign the commit and tag (`git commit -S`, `git tag -s`).
    pub sign: bool,
    /// Push the commit and tags after tagging.
    pub push: bool,
    /// Prefix of the commit message.
    pub commit_prefix: String,
}

impl Default for CanaryConfig {
    fn default() -> Self {
        Self {
            sign: false,
            push: true,
            commit_prefix: "[canary]".to_string(),
        }
    }
}
