// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              BuildError (~16 bytes)
//!                     |
//!   +------+------+---+---+------+------+
//!   |      |      |       |      |      |
//!   v      v      v       v      v      v
//!  Net    Cfg   Task    Proc    Fs   Platform/Version/Io
//!  Box    Box    Box     Box    Box   Box
//!
//! Sub-errors (unboxed internally):
//!   Network  Reqwest, HttpError, Timeout
//!   Config   ParseError, MissingKey, InvalidValue
//!   Task     Interrupted
//!   Process  SpawnFailed, NonZeroExit, Timeout
//!   Fs       NotFound, AmbiguousMatch
//!   Platform UnknownTarget, Unsupported, HostDetection
//!   Version  InvalidFormat, InvalidCanary, Overflow
//!
//! All variants boxed => BuildError fits in 16 bytes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`BuildError`].
pub type BuildResult<T> = std::result::Result<T, BuildError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~16 bytes on the stack.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Task execution error.
    #[error("task error: {0}")]
    Task(#[from] Box<TaskError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// Target or host platform error.
    #[error("platform error: {0}")]
    Platform(#[from] Box<PlatformError>),

    /// Version string error.
    #[error("version error: {0}")]
    Version(#[from] Box<VersionError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for BuildError {
                fn from(err: $error) -> Self {
                    BuildError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    NetworkError => Network,
    ConfigError => Config,
    TaskError => Task,
    ProcessError => Process,
    FsError => Fs,
    PlatformError => Platform,
    VersionError => Version,
    std::io::Error => Io,
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Download failed.
    #[error("download failed: {url} - {message}")]
    DownloadFailed { url: String, message: String },

    /// Download was interrupted by user or signal.
    #[error("download interrupted")]
    Interrupted,

    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Connection timeout.
    #[error("connection timeout: {url}")]
    Timeout { url: String },

    /// I/O error during download.
    #[error("io error during download: {0}")]
    Io(#[from] std::io::Error),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Task Errors ---

/// Task execution errors.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Task was interrupted.
    #[error("task '{0}' was interrupted")]
    Interrupted(String),
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with an unexpected status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Process timed out.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// Glob pattern did not resolve to exactly one entry.
    #[error("{what} not found (pattern '{pattern}' matched {matches} entries)")]
    AmbiguousMatch {
        what: String,
        pattern: String,
        matches: usize,
    },
}

// --- Platform Errors ---

/// Target and host platform errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Target name is not one of the known targets.
    #[error("Unknown target {0}")]
    UnknownTarget(String),

    /// Architecture name is not recognized.
    #[error("unknown architecture '{0}'")]
    UnknownArch(String),

    /// Target cannot be built on the current host.
    #[error("target '{target}' cannot be built on host '{host}'")]
    Unsupported { target: String, host: String },

    /// Host OS or version could not be determined.
    #[error("failed to detect host platform: {0}")]
    HostDetection(String),
}

// --- Version Errors ---

/// Canary version parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    /// Version is neither `X.Y.Z` nor `X.Y.Z-canary.N`.
    #[error("Version format in VERSION file is not X.Y.Z: '{0}'")]
    InvalidFormat(String),

    /// The `-canary.` suffix is not an integer.
    #[error("canary suffix '{0}' is not a number")]
    InvalidCanary(String),

    /// Incrementing the version would overflow.
    #[error("version '{0}' cannot be incremented")]
    Overflow(String),
}
