// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Canary command: bump the pre-release version and tag it.
//!
//! ```text
//! VERSION 1.2.3          --> 1.3.0-canary.0
//! VERSION 1.3.0-canary.4 --> 1.3.0-canary.5
//!
//! confirm --> write VERSION --> git add, commit, tag [, push, push --tags]
//! ```

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::canary::CanaryArgs;
use crate::config::Config;
use crate::config::paths::PathKey;
use crate::error::{Result, VersionError};
use crate::task::tools::git::GitTool;
use crate::task::tools::{Tool, ToolContext};

const CANARY_SEPARATOR: &str = "-canary.";

/// Computes the version following `current`.
///
/// A canary version gets its counter incremented; a release `X.Y.Z` starts
/// the canaries of the next minor version.
///
/// # Errors
///
/// Returns `VersionError::InvalidCanary` if the counter is not a number,
/// `VersionError::InvalidFormat` if a release version is not `X.Y.Z`, or
/// `VersionError::Overflow` if the incremented part does not fit a `u64`.
pub fn next_version(current: &str) -> std::result::Result<String, VersionError> {
    if let Some((base, counter)) = current.rsplit_once(CANARY_SEPARATOR) {
        let counter: u64 = counter
            .parse()
            .map_err(|_| VersionError::InvalidCanary(counter.to_string()))?;
        let next = counter
            .checked_add(1)
            .ok_or_else(|| VersionError::Overflow(current.to_string()))?;
        return Ok(format!("{base}{CANARY_SEPARATOR}{next}"));
    }

    let invalid = || VersionError::InvalidFormat(current.to_string());
    let parts = current
        .split('.')
        .map(|part| part.parse::<u64>().map_err(|_| invalid()))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [major, minor, _patch] => {
            let minor = minor
                .checked_add(1)
                .ok_or_else(|| VersionError::Overflow(current.to_string()))?;
            Ok(format!("{major}.{minor}.0{CANARY_SEPARATOR}0"))
        }
        _ => Err(invalid()),
    }
}

/// Git commands recording `version`, run in `repo`.
#[must_use]
pub fn git_steps(
    repo: &Path,
    version_file: &str,
    version: &str,
    commit_prefix: &str,
    sign: bool,
    push: bool,
) -> Vec<GitTool> {
    let message = if commit_prefix.is_empty() {
        format!("Bump version to {version}")
    } else {
        format!("{commit_prefix} Bump version to {version}")
    };

    let mut steps = vec![
        GitTool::add([version_file]),
        GitTool::commit(message).sign(sign),
        GitTool::tag(version).sign(sign),
    ];
    if push {
        steps.extend([GitTool::push(), GitTool::push_tags()]);
    }
    steps.into_iter().map(|step| step.path(repo)).collect()
}

/// Main handler for canary command, prompting on the terminal.
///
/// # Errors
///
/// Returns an error if the version file cannot be read or written, its
/// content is not a valid version, or a git command fails.
pub async fn run_canary_command(args: &CanaryArgs, config: &Config) -> Result<()> {
    let mut input = std::io::BufReader::new(std::io::stdin());
    let mut out = std::io::stdout();
    run_canary(args, config, &mut input, &mut out).await?;
    Ok(())
}

/// Runs the canary bump with explicit input and output streams.
///
/// Returns the new version, or `None` if the user declined.
///
/// # Errors
///
/// See [`run_canary_command`].
pub async fn run_canary<R, W>(
    args: &CanaryArgs,
    config: &Config,
    input: &mut R,
    out: &mut W,
) -> Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    let dry_run = args.dry_run || config.global.dry;
    let version_file = config.paths.get(PathKey::VersionFile)?;

    let content = tokio::fs::read_to_string(version_file)
        .await
        .with_context(|| format!("failed to read {}", version_file.display()))?;
    let current = content.trim();
    let next = next_version(current)?;

    writeln!(out, "Current version: {current}")?;
    writeln!(out, "New version: {next}")?;

    if !args.yes && !confirm(input, out)? {
        writeln!(out, "Version update canceled.")?;
        return Ok(None);
    }

    if dry_run {
        writeln!(out, "Would write {next} to {}", version_file.display())?;
    } else {
        tokio::fs::write(version_file, &next)
            .await
            .with_context(|| format!("failed to write {}", version_file.display()))?;
        writeln!(out, "Version updated in {} to {next}", version_file.display())?;
    }

    let repo = version_file.parent().unwrap_or_else(|| Path::new("."));
    let file_name = version_file
        .file_name()
        .map_or_else(|| "VERSION".into(), |name| name.to_string_lossy());
    let steps = git_steps(
        repo,
        &file_name,
        &next,
        &config.canary.commit_prefix,
        args.sign || config.canary.sign,
        config.canary.push && !args.no_push,
    );

    let ctx = ToolContext::new(Arc::new(config.clone()), CancellationToken::new(), dry_run);
    for step in &steps {
        if dry_run {
            writeln!(out, "Would run '{}'", step.command_line())?;
            continue;
        }
        info!(command = %step.command_line(), "running");
        step.run(&ctx).await?;
    }

    Ok(Some(next))
}

fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<bool> {
    write!(out, "Do you want to update the version? (y/N): ")?;
    out.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
