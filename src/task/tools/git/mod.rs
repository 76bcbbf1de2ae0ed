// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git tool for repository operations.
//!
//! ```text
//! GitTool
//! Source:  Init | AddRemote | Fetch (shallow) | ResetHard
//! Release: Add | Commit (-S) | Tag (-s) | Push (--tags)
//! Runs `git` (or tools.git) in `path` via ToolContext
//! ```
//!
//! A pinned commit is fetched without cloning the whole history:
//!
//! ```text
//! git init
//! git remote add origin <url>
//! git fetch --depth=1 origin <hash>
//! git reset --hard FETCH_HEAD
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use super::{BoxFuture, Tool, ToolContext};
use crate::core::process::builder::ProcessBuilder;
use crate::error::Result;

/// Git operation to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitOperation {
    Init,
    AddRemote { name: String, url: String },
    /// Fetch `refspec` from `remote`; `depth` limits history.
    Fetch {
        remote: String,
        refspec: String,
        depth: Option<u32>,
    },
    ResetHard { target: String },
    Add { paths: Vec<String> },
    Commit { message: String },
    Tag { name: String },
    Push { tags: bool },
}

#[derive(Debug, Clone)]
pub struct GitTool {
    path: Option<PathBuf>,
    sign: bool,
    operation: GitOperation,
}

impl GitTool {
    #[must_use]
    pub const fn new(operation: GitOperation) -> Self {
        Self {
            path: None,
            sign: false,
            operation,
        }
    }

    #[must_use]
    pub const fn init() -> Self {
        Self::new(GitOperation::Init)
    }

    #[must_use]
    pub fn add_remote(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(GitOperation::AddRemote {
            name: name.into(),
            url: url.into(),
        })
    }

    /// Fetches a single commit with `--depth=1`.
    #[must_use]
    pub fn fetch_shallow(remote: impl Into<String>, refspec: impl Into<String>) -> Self {
        Self::new(GitOperation::Fetch {
            remote: remote.into(),
            refspec: refspec.into(),
            depth: Some(1),
        })
    }

    #[must_use]
    pub fn reset_hard(target: impl Into<String>) -> Self {
        Self::new(GitOperation::ResetHard {
            target: target.into(),
        })
    }

    #[must_use]
    pub fn add<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(GitOperation::Add {
            paths: paths.into_iter().map(Into::into).collect(),
        })
    }

    #[must_use]
    pub fn commit(message: impl Into<String>) -> Self {
        Self::new(GitOperation::Commit {
            message: message.into(),
        })
    }

    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Self::new(GitOperation::Tag { name: name.into() })
    }

    #[must_use]
    pub const fn push() -> Self {
        Self::new(GitOperation::Push { tags: false })
    }

    #[must_use]
    pub const fn push_tags() -> Self {
        Self::new(GitOperation::Push { tags: true })
    }

    /// Working directory of the repository.
    #[must_use]
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// GPG-sign commits and tags.
    #[must_use]
    pub const fn sign(mut self, sign: bool) -> Self {
        self.sign = sign;
        self
    }

    #[must_use]
    pub const fn operation(&self) -> &GitOperation {
        &self.operation
    }

    /// Arguments passed to `git`.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        match &self.operation {
            GitOperation::Init => args.push("init".into()),
            GitOperation::AddRemote { name, url } => {
                args.extend(["remote".into(), "add".into(), name.clone(), url.clone()]);
            }
            GitOperation::Fetch {
                remote,
                refspec,
                depth,
            } => {
                args.push("fetch".into());
                if let Some(depth) = depth {
                    args.push(format!("--depth={depth}"));
                }
                args.extend([remote.clone(), refspec.clone()]);
            }
            GitOperation::ResetHard { target } => {
                args.extend(["reset".into(), "--hard".into(), target.clone()]);
            }
            GitOperation::Add { paths } => {
                args.push("add".into());
                args.extend(paths.iter().cloned());
            }
            GitOperation::Commit { message } => {
                args.push("commit".into());
                if self.sign {
                    args.push("-S".into());
                }
                args.extend(["-m".into(), message.clone()]);
            }
            GitOperation::Tag { name } if self.sign => {
                args.extend(["tag".into(), "-s".into(), name.clone(), "-m".into(), name.clone()]);
            }
            GitOperation::Tag { name } => args.extend(["tag".into(), name.clone()]),
            GitOperation::Push { tags } => {
                args.push("push".into());
                if *tags {
                    args.push("--tags".into());
                }
            }
        }
        args
    }

    /// The command as a user would type it, e.g. `git tag 1.2.0-canary.0`.
    #[must_use]
    pub fn command_line(&self) -> String {
        ProcessBuilder::new("git").args(self.args()).command_line()
    }

    const fn label(&self) -> &'static str {
        match self.operation {
            GitOperation::Init => "init",
            GitOperation::AddRemote { .. } => "remote add",
            GitOperation::Fetch { .. } => "fetch",
            GitOperation::ResetHard { .. } => "reset",
            GitOperation::Add { .. } => "add",
            GitOperation::Commit { .. } => "commit",
            GitOperation::Tag { .. } => "tag",
            GitOperation::Push { .. } => "push",
        }
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<()> {
        let mut builder = ctx
            .program(&ctx.config().tools.git, "git")?
            .args(self.args());
        if let Some(path) = &self.path {
            builder = builder.cwd(path);
        }

        debug!(op = self.label(), path = ?self.path, "running git");
        ctx.run(builder).await.with_context(|| {
            format!(
                "git {} failed{}",
                self.label(),
                self.path
                    .as_ref()
                    .map_or_else(String::new, |p| format!(" in {}", p.display()))
            )
        })?;
        Ok(())
    }
}

impl Tool for GitTool {
    fn name(&self) -> &'static str {
        "git"
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.execute(ctx))
    }
}
