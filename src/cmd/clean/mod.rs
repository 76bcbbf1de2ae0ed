// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clean command implementation.
//!
//! ```text
//! always        _build/<target>/<cfg>   _package/<target>/<cfg>
//! --source      _source/<target>/<cfg>
//! --deps        _install/<target>/<cfg>
//! --all-configurations  debug and release
//! ```

use std::path::Path;

use tracing::{debug, info};

use crate::cli::build::CleanArgs;
use crate::config::Config;
use crate::error::Result;
use crate::layout::Layout;
use crate::task::tools::sync::remove_existing;

/// Main handler for clean command.
///
/// The host is not consulted: output directory names only depend on the
/// target's OS and architecture.
///
/// # Errors
///
/// Returns an error if the paths are unresolved or a directory cannot be
/// removed.
pub async fn run_clean_command(args: &CleanArgs, config: &Config) -> Result<()> {
    let dry_run = config.global.dry;
    let platform = args.target.target.platform(None);

    for configuration in args.configurations() {
        let layout = Layout::new(&config.paths, &platform, configuration)?;

        let mut dirs = vec![("build", layout.build_dir()), ("package", layout.package_dir())];
        if args.source {
            dirs.push(("source", layout.source_dir()));
        }
        if args.deps {
            dirs.push(("install", layout.install_dir()));
        }

        for (label, dir) in dirs {
            clean_dir(dir, label, dry_run).await?;
        }
    }

    info!(target = %args.target.target, "Clean completed");
    Ok(())
}

async fn clean_dir(dir: &Path, label: &str, dry_run: bool) -> Result<()> {
    if !dir.exists() {
        debug!(path = %dir.display(), label, "nothing to clean");
        return Ok(());
    }
    if dry_run {
        info!(path = %dir.display(), "[dry-run] Would remove {label} directory");
        return Ok(());
    }
    info!(path = %dir.display(), "Removing {label} directory");
    remove_existing(dir).await
}
