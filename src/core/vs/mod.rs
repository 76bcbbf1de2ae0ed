// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Visual Studio installation discovery via vswhere.
//!
//! ```text
//! vswhere.exe -format json --> parse_vswhere_json() --> Vec<VsInstallation>
//!   filter complete, non-prerelease; newest first
//!   derived: vc_dir() --> BAZEL_VC
//! ```
//!
//! Bazel's MSVC toolchain auto-detection picks the first installation it
//! finds, so the build pins it explicitly.

use crate::core::process::builder::ProcessBuilder;
use crate::error::Result;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Standard vswhere.exe installation paths.
const VSWHERE_PATHS: &[&str] = &[
    r"C:\Program Files (x86)\Microsoft Visual Studio\Installer\vswhere.exe",
    r"C:\Program Files\Microsoft Visual Studio\Installer\vswhere.exe",
];

/// Component required for Bazel's C++ toolchain.
const VC_TOOLS_COMPONENT: &str = "Microsoft.VisualStudio.Component.VC.Tools.x86.x64";

/// Visual Studio installation information from vswhere JSON output.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsInstallation {
    pub instance_id: String,
    pub installation_path: PathBuf,
    /// Full version string (e.g., "17.14.36915.13").
    pub installation_version: String,
    pub display_name: String,
    #[serde(default = "default_true")]
    pub is_complete: bool,
    #[serde(default)]
    pub is_prerelease: bool,
}

const fn default_true() -> bool {
    true
}

impl VsInstallation {
    /// The `VC` directory, as expected in `BAZEL_VC`.
    #[must_use]
    pub fn vc_dir(&self) -> PathBuf {
        self.installation_path.join("VC")
    }

    /// Numeric version components, so "17.14" sorts after "17.9".
    fn version_tuple(&self) -> (u32, u32, u32, u32) {
        let mut parts = self
            .installation_version
            .split('.')
            .map(|s| s.parse().unwrap_or(0));
        let mut next = || parts.next().unwrap_or(0);
        (next(), next(), next(), next())
    }
}

/// Finds the vswhere.exe executable, checking PATH first.
///
/// # Errors
///
/// Returns an error if `vswhere.exe` is neither on PATH nor in a standard
/// Visual Studio Installer directory.
pub fn find_vswhere() -> Result<PathBuf> {
    if let Some(path) = ProcessBuilder::find("vswhere") {
        return Ok(path);
    }
    VSWHERE_PATHS
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow::anyhow!("vswhere.exe not found in standard VS Installer directories"))
}

/// Finds all complete, non-prerelease Visual Studio installations with C++
/// tools, newest first.
///
/// # Errors
///
/// Returns an error if vswhere cannot be found or run, or its output cannot
/// be parsed.
pub async fn find_installations() -> Result<Vec<VsInstallation>> {
    let vswhere = find_vswhere().context("Cannot find Visual Studio installations")?;

    let output = ProcessBuilder::new(vswhere)
        .args([
            "-format",
            "json",
            "-utf8",
            "-products",
            "*",
            "-requires",
            VC_TOOLS_COMPONENT,
        ])
        .capture_stdout()
        .run()
        .await
        .context("Failed to run vswhere")?;

    let installations = select_installations(parse_vswhere_json(output.stdout())?);
    debug!(
        count = installations.len(),
        "Found Visual Studio installations"
    );
    Ok(installations)
}

/// Finds the newest Visual Studio installation with C++ tools.
///
/// # Errors
///
/// Returns an error if no suitable installation is found.
pub async fn find_latest() -> Result<VsInstallation> {
    find_installations()
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No Visual Studio installations found with C++ tools"))
}

fn parse_vswhere_json(json: &str) -> Result<Vec<VsInstallation>> {
    serde_json::from_str(json).context("Failed to parse vswhere JSON output")
}

fn select_installations(mut installations: Vec<VsInstallation>) -> Vec<VsInstallation> {
    installations.retain(|vs| vs.is_complete && !vs.is_prerelease);
    installations.sort_by_key(|vs| std::cmp::Reverse(vs.version_tuple()));
    installations
}

#[cfg(test)]
mod tests;
