// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Concrete task implementations.
//!
//! ```text
//! build:   BazeliskTask -> QuicheTask -> BazelBuildTask
//! package: PackageTask   (libmoqt + quiche/absl headers)
//! test:    NativeTestTask (compile + run test/main.cpp)
//! ```

pub mod bazel;
pub mod bazelisk;
pub mod native_test;
pub mod package;
pub mod quiche;
