// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment variable management.
//!
//! ```text
//! current_env() --> Env --> prepend_path(install/bazelisk)
//!                       --> set(BAZEL_VC, ...)
//!                       --> ProcessBuilder::env()
//! ```
//!
//! Tools get their own `Env` instead of mutating the driver's process
//! environment.

pub mod container;
pub mod types;


/// Captures the current process environment.
#[must_use]
pub fn current_env() -> container::Env {
    container::Env::from_map(
        std::env::vars_os()
            .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
            .collect(),
    )
}
