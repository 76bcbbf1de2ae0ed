// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Targets command implementation.

use crate::error::Result;
use crate::platform::{Platform, Target, detect_host};

/// Main handler for targets command.
///
/// # Errors
///
/// Returns an error if the host platform cannot be detected.
pub async fn run_targets_command() -> Result<()> {
    let host = detect_host().await?;
    println!("Host: {host}");
    for line in format_targets(&host) {
        println!("{line}");
    }
    Ok(())
}

/// One aligned line per target: name, OS, architecture, and whether `host`
/// can build it.
#[must_use]
pub fn format_targets(host: &Platform) -> Vec<String> {
    let width = Target::ALL
        .iter()
        .map(|t| t.as_str().len())
        .max()
        .unwrap_or(0);

    Target::ALL
        .iter()
        .map(|target| {
            let platform = target.platform(host.osver.as_deref());
            let arch = platform.arch.map_or("-", |arch| arch.as_str());
            let buildable = if target.buildable_on(host) { "yes" } else { "no" };
            format!(
                "{:<width$}  {:<8} {:<7} {buildable}",
                target.as_str(),
                platform.os.as_str(),
                arch
            )
        })
        .collect()
}
