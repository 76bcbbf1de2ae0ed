// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for moqt-build.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. moqt-build.toml (cwd, optional)
//! 3. --config FILE (repeatable, required)
//! 4. MOQT_BUILD_* env vars
//! 5. -s section/key=value overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! MOQT_BUILD_GLOBAL_DRY=true    → global.dry = true
//! MOQT_BUILD_PATHS_ROOT=/path   → paths.root = "/path"
//! MOQT_BUILD_CANARY_SIGN=true   → canary.sign = true
//! ```

pub mod loader;
pub mod paths;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

use loader::ConfigLoader;
use paths::PathsConfig;
use types::{BazeliskConfig, CanaryConfig, GlobalConfig, QuicheConfig, ToolsConfig};

/// Name of the optional configuration file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "moqt-build.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "MOQT_BUILD";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Paths configuration.
    pub paths: PathsConfig,
    /// Upstream quiche settings.
    pub quiche: QuicheConfig,
    /// Bazelisk download settings.
    pub bazelisk: BazeliskConfig,
    /// Tool paths.
    pub tools: ToolsConfig,
    /// Canary release settings.
    pub canary: CanaryConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use moqt_build::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("moqt-build.toml")
    ///     .with_env_prefix("MOQT_BUILD")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Resolve all paths and validate configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if path resolution fails.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        self.paths.resolve()?;
        if self.quiche.bazel_target.trim().is_empty() {
            return Err(crate::error::ConfigError::InvalidValue {
                section: "quiche".to_string(),
                key: "bazel_target".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_paths_options(&mut options);
        self.format_quiche_options(&mut options);
        self.format_tools_options(&mut options);
        self.format_canary_options(&mut options);
        options.insert(
            "bazelisk/download_url".into(),
            self.bazelisk.download_url.clone(),
        );

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global/dry".into(), self.global.dry.to_string());
        options.insert(
            "global/output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global/file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global/log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("global/log_json".into(), self.global.log_json.to_string());
    }

    fn format_paths_options(&self, options: &mut BTreeMap<String, String>) {
        let fmt = |p: &Option<PathBuf>| {
            p.as_ref()
                .map_or_else(String::new, |p| p.display().to_string())
        };

        options.insert("paths/root".into(), fmt(&self.paths.root));
        options.insert("paths/source".into(), fmt(&self.paths.source));
        options.insert("paths/build".into(), fmt(&self.paths.build));
        options.insert("paths/install".into(), fmt(&self.paths.install));
        options.insert("paths/package".into(), fmt(&self.paths.package));
        options.insert("paths/deps_file".into(), fmt(&self.paths.deps_file));
        options.insert("paths/version_file".into(), fmt(&self.paths.version_file));
        options.insert("paths/test_source".into(), fmt(&self.paths.test_source));
    }

    fn format_quiche_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("quiche/url".into(), self.quiche.url.clone());
        options.insert(
            "quiche/bazel_target".into(),
            self.quiche.bazel_target.clone(),
        );
        options.insert(
            "quiche/extra_bazel_args".into(),
            self.quiche.extra_bazel_args.join(" "),
        );
    }

    fn format_tools_options(&self, options: &mut BTreeMap<String, String>) {
        let fmt = |p: &Path| {
            if p.as_os_str().is_empty() {
                "(PATH)".to_string()
            } else {
                p.display().to_string()
            }
        };

        options.insert("tools/git".into(), fmt(&self.tools.git));
        options.insert("tools/bazelisk".into(), fmt(&self.tools.bazelisk));
        options.insert("tools/rsync".into(), fmt(&self.tools.rsync));
        options.insert("tools/robocopy".into(), fmt(&self.tools.robocopy));
        options.insert("tools/cxx".into(), fmt(&self.tools.cxx));
    }

    fn format_canary_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("canary/sign".into(), self.canary.sign.to_string());
        options.insert("canary/push".into(), self.canary.push.to_string());
        options.insert(
            "canary/commit_prefix".into(),
            self.canary.commit_prefix.clone(),
        );
    }
}
