// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Canary command arguments.

use clap::{ArgAction, Args};

/// Arguments for the `canary` command.
#[derive(Debug, Clone, Default, Args)]
pub struct CanaryArgs {
    /// Answers yes to the confirmation prompt.
    #[arg(short = 'y', long, action = ArgAction::SetTrue)]
    pub yes: bool,

    /// Shows the new version and git commands without changing anything.
    /// Same as the global --dry.
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Commits and tags without pushing.
    #[arg(long = "no-push", action = ArgAction::SetTrue)]
    pub no_push: bool,

    /// Signs the commit and tag, overriding `canary/sign`.
    #[arg(long, action = ArgAction::SetTrue)]
    pub sign: bool,
}
