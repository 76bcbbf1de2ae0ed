// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build targets and platforms.
//!
//! ```text
//! "ubuntu-24.04_x86_64" --parse--> Target::Ubuntu2404X86_64
//!                                        |
//!                          platform(host osver)
//!                                        v
//!                 Platform { os: ubuntu, osver: 24.04, arch: x86_64 }
//!                                        |
//!                                 package_name()
//!                                        v
//!                              "ubuntu-24.04_x86_64"
//!
//! BuildPlatforms { build: detect_host(), target } validates the pair.
//! ```

pub mod host;


use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::PlatformError;

pub use host::detect_host;

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Windows,
    Macos,
    Ubuntu,
    Ios,
    Android,
}

impl Os {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Macos => "macos",
            Self::Ubuntu => "ubuntu",
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture, named the way package directories spell it.
///
/// 64-bit ARM is `arm64` on Apple and Windows platforms and `armv8` on Ubuntu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X86_64,
    Arm64,
    Armv8,
}

impl Arch {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Arm64 => "arm64",
            Self::Armv8 => "armv8",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x86_64" | "amd64" | "x64" => Ok(Self::X86_64),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            "armv8" => Ok(Self::Armv8),
            other => Err(PlatformError::UnknownArch(other.to_string())),
        }
    }
}

/// An OS/version/architecture triple.
///
/// `osver` and `arch` are absent for mobile targets, whose packages span
/// several OS versions and architectures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Platform {
    pub os: Os,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub osver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<Arch>,
}

impl Platform {
    #[must_use]
    pub fn new(os: Os, osver: Option<impl Into<String>>, arch: Option<Arch>) -> Self {
        Self {
            os,
            osver: osver.map(Into::into),
            arch,
        }
    }

    /// Directory name used for this platform under `_source`, `_build`,
    /// `_install` and `_package`.
    ///
    /// ```text
    /// ios                     (no arch)
    /// windows_x86_64          (desktop OS versions are not part of the name)
    /// ubuntu-24.04_armv8      (distribution version is)
    /// ```
    #[must_use]
    pub fn package_name(&self) -> String {
        match (&self.osver, self.arch) {
            (_, None) => self.os.to_string(),
            (Some(osver), Some(arch)) if self.os == Os::Ubuntu => {
                format!("{}-{osver}_{arch}", self.os)
            }
            (_, Some(arch)) => format!("{}_{arch}", self.os),
        }
    }

    /// Whether this is a Windows host, which switches file sync to robocopy.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    /// Bazelisk release asset suffix for this build host.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Unsupported` for platforms that cannot run
    /// Bazelisk (mobile targets).
    pub fn bazelisk_asset(&self) -> Result<&'static str, PlatformError> {
        let asset = match (self.os, self.arch) {
            (Os::Ubuntu, Some(Arch::X86_64)) => "linux-amd64",
            (Os::Ubuntu, Some(Arch::Armv8 | Arch::Arm64)) => "linux-arm64",
            (Os::Macos, Some(Arch::X86_64)) => "darwin-amd64",
            (Os::Macos, Some(Arch::Arm64 | Arch::Armv8)) => "darwin-arm64",
            (Os::Windows, Some(Arch::X86_64)) => "windows-amd64.exe",
            (Os::Windows, Some(Arch::Arm64 | Arch::Armv8)) => "windows-arm64.exe",
            _ => {
                return Err(PlatformError::Unsupported {
                    target: "bazelisk".to_string(),
                    host: self.package_name(),
                });
            }
        };
        Ok(asset)
    }

    /// File name of an executable on this platform.
    #[must_use]
    pub fn executable_name(&self, stem: &str) -> String {
        if self.is_windows() {
            format!("{stem}.exe")
        } else {
            stem.to_string()
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.package_name())
    }
}

/// A named target the library can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    WindowsX86_64,
    MacosX86_64,
    MacosArm64,
    Ubuntu2404X86_64,
    Ubuntu2404Armv8,
    Ios,
    Android,
}

impl Target {
    /// Every target, in the order they are listed to users.
    pub const ALL: [Self; 7] = [
        Self::WindowsX86_64,
        Self::MacosX86_64,
        Self::MacosArm64,
        Self::Ubuntu2404X86_64,
        Self::Ubuntu2404Armv8,
        Self::Ios,
        Self::Android,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WindowsX86_64 => "windows_x86_64",
            Self::MacosX86_64 => "macos_x86_64",
            Self::MacosArm64 => "macos_arm64",
            Self::Ubuntu2404X86_64 => "ubuntu-24.04_x86_64",
            Self::Ubuntu2404Armv8 => "ubuntu-24.04_armv8",
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }

    /// Names of every target, for CLI value validation.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.as_str()).collect()
    }

    /// Maps the target to its platform.
    ///
    /// Desktop Windows and macOS targets take the OS version of the host
    /// they are built on.
    #[must_use]
    pub fn platform(self, host_osver: Option<&str>) -> Platform {
        let host_osver = host_osver.map(str::to_string);
        match self {
            Self::WindowsX86_64 => Platform::new(Os::Windows, host_osver, Some(Arch::X86_64)),
            Self::MacosX86_64 => Platform::new(Os::Macos, host_osver, Some(Arch::X86_64)),
            Self::MacosArm64 => Platform::new(Os::Macos, host_osver, Some(Arch::Arm64)),
            Self::Ubuntu2404X86_64 => Platform::new(Os::Ubuntu, Some("24.04"), Some(Arch::X86_64)),
            Self::Ubuntu2404Armv8 => Platform::new(Os::Ubuntu, Some("24.04"), Some(Arch::Armv8)),
            Self::Ios => Platform::new(Os::Ios, None::<String>, None),
            Self::Android => Platform::new(Os::Android, None::<String>, None),
        }
    }

    /// Whether `host` can build this target.
    ///
    /// ```text
    /// windows_*  <- windows
    /// macos_*    <- macos
    /// ios        <- macos
    /// ubuntu-*   <- ubuntu
    /// android    <- ubuntu, macos
    /// ```
    #[must_use]
    pub fn buildable_on(self, host: &Platform) -> bool {
        match self {
            Self::WindowsX86_64 => host.os == Os::Windows,
            Self::MacosX86_64 | Self::MacosArm64 | Self::Ios => host.os == Os::Macos,
            Self::Ubuntu2404X86_64 | Self::Ubuntu2404Armv8 => host.os == Os::Ubuntu,
            Self::Android => matches!(host.os, Os::Ubuntu | Os::Macos),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PlatformError::UnknownTarget(s.to_string()))
    }
}

/// The host doing the build and the platform being built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlatforms {
    pub target_name: Target,
    pub build: Platform,
    pub target: Platform,
}

impl BuildPlatforms {
    /// Pairs a target with the build host.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Unsupported` if the host cannot build the target.
    pub fn new(target: Target, build: Platform) -> Result<Self, PlatformError> {
        if !target.buildable_on(&build) {
            return Err(PlatformError::Unsupported {
                target: target.to_string(),
                host: build.package_name(),
            });
        }
        let target_platform = target.platform(build.osver.as_deref());
        Ok(Self {
            target_name: target,
            build,
            target: target_platform,
        })
    }
}
