// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Windows-specific process utilities.
//!
//! ```text
//! cancellation: send_ctrl_break(pid) -> 500ms -> kill -> wait
//! ```
//!
//! Children are spawned with `CREATE_NEW_PROCESS_GROUP`, so the pid doubles
//! as the process group id. Bazel uses the break to shut its server down
//! cleanly.

use crate::error::Result;

/// Sends `CTRL_BREAK_EVENT` to the process group rooted at `pid`.
///
/// # Errors
///
/// Returns an error if `GenerateConsoleCtrlEvent` fails.
pub(super) fn send_ctrl_break(pid: u32) -> Result<()> {
    use windows::Win32::System::Console::{CTRL_BREAK_EVENT, GenerateConsoleCtrlEvent};

    // SAFETY: GenerateConsoleCtrlEvent only reads its two integer arguments.
    unsafe {
        GenerateConsoleCtrlEvent(CTRL_BREAK_EVENT, pid).map_err(|e: windows::core::Error| {
            anyhow::anyhow!("Failed to send CTRL_BREAK: {}", e.message())
        })?;
    }
    Ok(())
}
