// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! moqt-build [global options] <command>
//! version
//! options
//! targets
//! build   <target> [--debug] [--redownload] [--reextract] [--rebuild] [-n]
//! package <target> [--debug]
//! test    <target> [--debug]
//! clean   <target> [--debug] [--source] [--deps] [--all-configurations]
//! canary  [-y] [--dry-run] [--no-push] [--sign]
//! ```

pub mod build;
pub mod canary;
pub mod global;


use crate::cli::build::{BuildArgs, CleanArgs, TargetArgs};
use crate::cli::canary::CanaryArgs;
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// MOQT Native Library Build Driver
///
/// Builds the MOQT library from a pinned quiche snapshot with Bazel and
/// packages it for native consumers.
#[derive(Debug, Parser)]
#[command(
    name = "moqt-build",
    author,
    version,
    about = "MOQT Native Library Build Driver",
    long_about = "moqt-build Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Builds the MOQT library from the quiche revision pinned in DEPS.\n\n\
                  `moqt-build build <target>` installs bazelisk, fetches quiche and\n\
                  builds; `package` collects the library and headers; `test`\n\
                  compiles and runs the smoke test against the package. See\n\
                  `moqt-build <command> --help` for more information about a command.",
    after_help = "CONFIGURATION:\n\n\
                  Settings are layered: built-in defaults, then `moqt-build.toml` in\n\
                  the current directory (skipped with --no-default-config), then each\n\
                  --config file in order, then MOQT_BUILD_* environment variables,\n\
                  then --set overrides and dedicated flags such as --root."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the targets and whether this host can build them.
    Targets,

    /// Installs bazelisk, fetches quiche and builds the MOQT library.
    Build(BuildArgs),

    /// Collects the built library and headers into the package directory.
    Package(TargetArgs),

    /// Compiles and runs the smoke test against the package.
    Test(TargetArgs),

    /// Removes build outputs, and optionally sources and dependencies.
    Clean(CleanArgs),

    /// Bumps the canary version in VERSION, then commits and tags it.
    Canary(CanaryArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
