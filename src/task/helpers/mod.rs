// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! File-system helpers shared by tasks.
//!
//! All helpers are dry-run aware: in a dry run they log what they would do
//! and leave the file system untouched.
//!
//! | Function | Purpose |
//! |----------|---------|
//! | [`ensure_dir`] | Create a directory if it does not exist |
//! | [`remove_path`] | Delete a file or directory tree if present |
//! | [`install_file`] | Replace `dst` with a copy of `src` (recursive for directories) |
//! | [`find_single`] | Resolve a glob inside a directory to exactly one entry |

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};
use wax::{Glob, Program as _};

use crate::error::{FsError, Result};
use crate::task::TaskContext;
use crate::task::tools::sync::remove_existing;

/// Ensure a directory exists, creating it and its parents if necessary.
///
/// # Errors
///
/// Returns an error if the directory creation fails.
pub async fn ensure_dir(ctx: &TaskContext, path: &Path, label: &str) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    if ctx.is_dry_run() {
        info!(path = %path.display(), "[dry-run] Would create {}", label);
        return Ok(());
    }

    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("failed to create {}", path.display()))?;
    debug!(path = %path.display(), "created {}", label);
    Ok(())
}

/// Delete a file or a directory tree. Missing paths are not an error.
///
/// # Errors
///
/// Returns an error if the deletion fails.
pub async fn remove_path(ctx: &TaskContext, path: &Path, label: &str) -> Result<()> {
    if tokio::fs::symlink_metadata(path).await.is_err() {
        debug!(path = %path.display(), "no {} to delete", label);
        return Ok(());
    }

    if ctx.is_dry_run() {
        info!(path = %path.display(), "[dry-run] Would delete {}", label);
        return Ok(());
    }

    info!(path = %path.display(), "Deleting {}", label);
    remove_existing(path).await
}

/// Replace `dst` with a copy of `src`.
///
/// An existing `dst` is removed first, whether file or directory, and its
/// parent is created. Directories are copied recursively.
///
/// # Errors
///
/// Returns an error if `src` does not exist or any copy fails.
pub async fn install_file(ctx: &TaskContext, src: &Path, dst: &Path) -> Result<()> {
    if ctx.is_dry_run() {
        info!(src = %src.display(), dst = %dst.display(), "[dry-run] Would copy");
        return Ok(());
    }

    let meta = tokio::fs::metadata(src)
        .await
        .map_err(|_| FsError::NotFound(src.display().to_string()))?;

    remove_existing(dst).await?;
    if let Some(parent) = dst.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    if meta.is_dir() {
        copy_dir(src, dst).await?;
    } else {
        tokio::fs::copy(src, dst)
            .await
            .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
    }
    info!(src = %src.display(), dst = %dst.display(), "Installed");
    Ok(())
}

async fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    let mut pending = vec![(src.to_path_buf(), dst.to_path_buf())];

    while let Some((from, to)) = pending.pop() {
        tokio::fs::create_dir_all(&to)
            .await
            .with_context(|| format!("failed to create {}", to.display()))?;

        let mut entries = tokio::fs::read_dir(&from)
            .await
            .with_context(|| format!("failed to read {}", from.display()))?;
        while let Some(entry) = entries.next_entry().await? {
            let target = to.join(entry.file_name());
            if entry.file_type().await?.is_dir() {
                pending.push((entry.path(), target));
            } else {
                tokio::fs::copy(entry.path(), &target).await.with_context(|| {
                    format!("failed to copy {} to {}", entry.path().display(), target.display())
                })?;
            }
        }
    }
    Ok(())
}

/// Find the single entry of `dir` whose name matches `pattern`.
///
/// `what` names the entry in the error, e.g. `"abseil-cpp"`.
///
/// # Errors
///
/// Returns `FsError::AmbiguousMatch` unless exactly one entry matches, or an
/// error if the pattern is invalid.
pub async fn find_single(dir: &Path, pattern: &str, what: &str) -> Result<PathBuf> {
    let glob = Glob::new(pattern)
        .map_err(|e| anyhow::anyhow!("invalid glob pattern '{pattern}': {e}"))?;

    let mut matches = Vec::new();
    if let Ok(mut entries) = tokio::fs::read_dir(dir).await {
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if glob.is_match(name.to_string_lossy().as_ref()) {
                matches.push(entry.path());
            }
        }
    }

    if matches.len() != 1 {
        return Err(FsError::AmbiguousMatch {
            what: what.to_string(),
            pattern: dir.join(pattern).display().to_string(),
            matches: matches.len(),
        }
        .into());
    }
    Ok(matches.remove(0))
}

#[cfg(test)]
mod tests;
