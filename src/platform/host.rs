// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build host detection.
//!
//! ```text
//! linux   /etc/os-release  ID=ubuntu, VERSION_ID="24.04"
//! macos   sw_vers -productVersion  --> "14.5"
//! windows cmd /C ver  "Microsoft Windows [Version 10.0.22631.4317]" --> "10.0.22631"
//! ```

use std::sync::OnceLock;

use anyhow::Context;
use regex::Regex;
use tracing::debug;

use super::{Arch, Os, Platform};
use crate::core::process::builder::ProcessBuilder;
use crate::error::{PlatformError, Result};

const OS_RELEASE: &str = "/etc/os-release";

/// Detects the platform of the machine running the build.
///
/// # Errors
///
/// Returns `PlatformError::HostDetection` on an unsupported OS or Linux
/// distribution, or if the OS version cannot be determined.
pub async fn detect_host() -> Result<Platform> {
    let (os, osver) = match std::env::consts::OS {
        "linux" => {
            let content = tokio::fs::read_to_string(OS_RELEASE)
                .await
                .with_context(|| format!("failed to read {OS_RELEASE}"))?;
            let release = OsRelease::parse(&content);
            match release.id.as_deref() {
                Some("ubuntu") => Os::Ubuntu,
                other => {
                    return Err(PlatformError::HostDetection(format!(
                        "unsupported Linux distribution '{}'",
                        other.unwrap_or("unknown")
                    ))
                    .into());
                }
            }
            .with_version(release.version_id)?
        }
        "macos" => {
            let output = ProcessBuilder::new("sw_vers")
                .arg("-productVersion")
                .capture_stdout()
                .run()
                .await
                .context("failed to query macOS version")?;
            Os::Macos.with_version(Some(output.stdout().trim().to_string()))?
        }
        "windows" => {
            let output = ProcessBuilder::new("cmd")
                .args(["/C", "ver"])
                .capture_stdout()
                .run()
                .await
                .context("failed to query Windows version")?;
            Os::Windows.with_version(parse_windows_version(output.stdout()))?
        }
        other => {
            return Err(PlatformError::HostDetection(format!("unsupported OS '{other}'")).into());
        }
    };

    let arch = host_arch(os, std::env::consts::ARCH)?;
    let platform = Platform::new(os, Some(osver), Some(arch));
    debug!(host = %platform, "detected build host");
    Ok(platform)
}

impl Os {
    fn with_version(self, version: Option<String>) -> Result<(Self, String)> {
        match version {
            Some(v) if !v.is_empty() => Ok((self, v)),
            _ => Err(PlatformError::HostDetection(format!("cannot determine {self} version")).into()),
        }
    }
}

/// Maps a Rust architecture name to the package spelling for `os`.
pub(crate) fn host_arch(os: Os, arch: &str) -> std::result::Result<Arch, PlatformError> {
    match (os, arch.parse::<Arch>()?) {
        (Os::Ubuntu | Os::Android, Arch::Arm64) => Ok(Arch::Armv8),
        (_, arch) => Ok(arch),
    }
}

/// The fields of `/etc/os-release` needed to identify the host.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct OsRelease {
    pub(crate) id: Option<String>,
    pub(crate) version_id: Option<String>,
}

impl OsRelease {
    pub(crate) fn parse(content: &str) -> Self {
        let mut release = Self::default();
        for line in content.lines() {
            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches(['"', '\'']).to_string();
            match key.trim() {
                "ID" => release.id = Some(value),
                "VERSION_ID" => release.version_id = Some(value),
                _ => {}
            }
        }
        release
    }
}

/// Extracts `major.minor.build` from the output of `ver`.
pub(crate) fn parse_windows_version(output: &str) -> Option<String> {
    static VERSION: OnceLock<Option<Regex>> = OnceLock::new();
    VERSION
        .get_or_init(|| Regex::new(r"([0-9]+\.[0-9]+\.[0-9]+)").ok())
        .as_ref()?
        .captures(output)
        .map(|c| c[1].to_string())
}
