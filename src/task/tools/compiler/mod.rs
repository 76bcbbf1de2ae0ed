// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! C++ compiler driver for the package smoke test.
//!
//! ```text
//! tools.cxx | clang++ | g++ | c++        (cl on Windows)
//!   gnu:  c++ -std=c++20 -I<inc> main.cpp -o <out> -L<lib> -lmoqt -lpthread
//!   msvc: cl /nologo /std:c++20 /EHsc /I <inc> main.cpp /Fe:<out> /link <lib>\moqt.lib
//! ```
//!
//! Only the packaged archive is linked. A link failure on absl or quiche
//! symbols means the archive is not self-contained.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use super::{BoxFuture, Tool, ToolContext};
use crate::core::process::builder::ProcessBuilder;
use crate::error::{ProcessError, Result};

/// Compilers tried, in order, when none is configured.
#[cfg(windows)]
pub const CANDIDATES: &[&str] = &["cl", "clang++"];
#[cfg(not(windows))]
pub const CANDIDATES: &[&str] = &["clang++", "g++", "c++"];

const CXX_STANDARD: &str = "c++20";

/// Command-line dialect of the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerFlavor {
    Gnu,
    Msvc,
}

impl CompilerFlavor {
    /// `cl` speaks MSVC; everything else is assumed GCC compatible.
    #[must_use]
    pub fn detect(program: &Path) -> Self {
        let stem = program
            .file_stem()
            .map(|s| s.to_string_lossy().to_ascii_lowercase());
        match stem.as_deref() {
            Some("cl" | "clang-cl") => Self::Msvc,
            _ => Self::Gnu,
        }
    }
}

/// Compiles one source file against the packaged headers and library.
#[derive(Debug, Clone)]
pub struct CompilerTool {
    source: PathBuf,
    output: PathBuf,
    include_dirs: Vec<PathBuf>,
    lib_dir: Option<PathBuf>,
    libs: Vec<String>,
}

impl CompilerTool {
    #[must_use]
    pub fn new(source: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            include_dirs: Vec::new(),
            lib_dir: None,
            libs: Vec::new(),
        }
    }

    #[must_use]
    pub fn include_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.include_dirs.push(dir.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn lib_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.lib_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Links a library by its bare name (`moqt` for `libmoqt.a`/`moqt.lib`).
    #[must_use]
    pub fn link(mut self, lib: impl Into<String>) -> Self {
        self.libs.push(lib.into());
        self
    }

    #[must_use]
    pub fn args(&self, flavor: CompilerFlavor) -> Vec<String> {
        let mut args = Vec::new();
        match flavor {
            CompilerFlavor::Gnu => {
                args.push(format!("-std={CXX_STANDARD}"));
                args.extend(self.include_dirs.iter().map(|d| format!("-I{}", d.display())));
                args.push(self.source.display().to_string());
                args.push("-o".to_string());
                args.push(self.output.display().to_string());
                if let Some(lib_dir) = &self.lib_dir {
                    args.push(format!("-L{}", lib_dir.display()));
                }
                args.extend(self.libs.iter().map(|l| format!("-l{l}")));
                if cfg!(unix) {
                    args.push("-lpthread".to_string());
                }
            }
            CompilerFlavor::Msvc => {
                args.extend(["/nologo".to_string(), format!("/std:{CXX_STANDARD}"), "/EHsc".to_string()]);
                for dir in &self.include_dirs {
                    args.push("/I".to_string());
                    args.push(dir.display().to_string());
                }
                args.push(self.source.display().to_string());
                args.push(format!("/Fe:{}", self.output.display()));
                args.push("/link".to_string());
                for lib in &self.libs {
                    let file = format!("{lib}.lib");
                    let path = self
                        .lib_dir
                        .as_ref()
                        .map_or_else(|| PathBuf::from(&file), |d| d.join(&file));
                    args.push(path.display().to_string());
                }
            }
        }
        args
    }

    /// Finds the compiler: `tools.cxx` if set, else the first candidate found.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if no compiler is found.
    pub fn locate(ctx: &ToolContext) -> Result<ProcessBuilder> {
        let configured = &ctx.config().tools.cxx;
        if !configured.as_os_str().is_empty() {
            return ctx.program(configured, "c++");
        }
        if let Some(builder) = CANDIDATES
            .iter()
            .find_map(|candidate| ctx.find(Path::new(""), candidate).ok())
        {
            return Ok(builder);
        }
        if ctx.is_dry_run() {
            return ctx.program(Path::new(""), CANDIDATES[0]);
        }
        Err(ProcessError::ExecutableNotFound {
            name: CANDIDATES.join(" | "),
        }
        .into())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<()> {
        let compiler = Self::locate(ctx)?;
        let flavor = CompilerFlavor::detect(compiler.program());

        if !ctx.is_dry_run()
            && let Some(parent) = self.output.parent()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        info!(
            source = %self.source.display(),
            compiler = %compiler.display_name(),
            "Compiling"
        );
        ctx.run(compiler.args(self.args(flavor)))
            .await
            .with_context(|| format!("failed to compile {}", self.source.display()))?;
        Ok(())
    }
}

impl Tool for CompilerTool {
    fn name(&self) -> &'static str {
        "c++"
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.execute(ctx))
    }
}
