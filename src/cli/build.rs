// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the target-based commands.
//!
//! # Flag Effects
//!
//! ```text
//! build   --new (-n) implies: --redownload --reextract --rebuild
//! clean   --all-configurations cleans debug and release
//! ```

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{ArgAction, Args};

use crate::config::types::Configuration;
use crate::platform::Target;

/// Accepts only the names in [`Target::ALL`] and lists them in `--help`.
fn target_parser() -> impl TypedValueParser<Value = Target> {
    PossibleValuesParser::new(Target::names()).try_map(|name| name.parse::<Target>())
}

/// Target selection shared by build, package, test and clean.
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Target to build for.
    #[arg(value_name = "TARGET", value_parser = target_parser())]
    pub target: Target,

    /// Uses the debug configuration instead of release.
    #[arg(long, action = ArgAction::SetTrue)]
    pub debug: bool,
}

impl TargetArgs {
    #[must_use]
    pub const fn configuration(&self) -> Configuration {
        Configuration::from_debug_flag(self.debug)
    }
}

/// Arguments for the `build` command.
#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Re-downloads bazelisk even if the pinned version is installed.
    #[arg(long, action = ArgAction::SetTrue)]
    pub redownload: bool,

    /// Removes the quiche checkout and fetches it again.
    #[arg(long, action = ArgAction::SetTrue)]
    pub reextract: bool,

    /// Runs `bazelisk clean` before building.
    #[arg(long, action = ArgAction::SetTrue)]
    pub rebuild: bool,

    /// Deletes everything and starts over, same as --redownload --reextract --rebuild.
    #[arg(short = 'n', long = "new", action = ArgAction::SetTrue)]
    pub new_build: bool,
}

/// Arguments for the `clean` command.
#[derive(Debug, Clone, Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Also removes the quiche checkout.
    #[arg(long, action = ArgAction::SetTrue)]
    pub source: bool,

    /// Also removes installed dependencies (bazelisk).
    #[arg(long, action = ArgAction::SetTrue)]
    pub deps: bool,

    /// Cleans both the debug and release configurations.
    #[arg(long = "all-configurations", action = ArgAction::SetTrue)]
    pub all_configurations: bool,
}

impl CleanArgs {
    /// Configurations to clean, in a stable order.
    #[must_use]
    pub fn configurations(&self) -> Vec<Configuration> {
        if self.all_configurations {
            Configuration::ALL.to_vec()
        } else {
            vec![self.target.configuration()]
        }
    }
}
