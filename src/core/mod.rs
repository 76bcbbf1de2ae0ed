// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for process and environment management.
//!
//! ```text
//!              core
//!               |
//!     +---------+---------+
//!     |         |         |
//!     v         v         v
//!    env     process      vs
//!     |         |         |
//!    Env     Builder   vswhere
//!    PATH    Output    BAZEL_VC
//! ```

pub mod env;
pub mod process;
pub mod vs;
