// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands.

use crate::config::Config;

/// Display current configuration options as `section/key = value`.
pub fn run_options_command(config: &Config, loaded_files: &[String]) {
    if loaded_files.is_empty() {
        println!("# no configuration files loaded");
    } else {
        for line in loaded_files {
            println!("# {line}");
        }
    }
    for line in config.format_options() {
        println!("{line}");
    }
}
