// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |      build / package / test / canary
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!              task      platform     net
//!            manager      layout    HTTP/DL
//!               |          deps
//!          +----+----+
//!          v         v
//!       tasks      tools
//!     (phases)   git/bazel/rsync/c++
//!
//!   +-----------------------------------------+
//!   |  core   process, env, VS discovery      |
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod deps;
pub mod error;
pub mod layout;
pub mod logging;
pub mod net;
pub mod platform;
pub mod task;
