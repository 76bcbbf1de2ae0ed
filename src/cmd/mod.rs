// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   build, package, test, clean, canary, targets, options
//! ```

pub mod build;
pub mod canary;
pub mod clean;
pub mod config;
pub mod targets;
