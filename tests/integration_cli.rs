// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use clap::{CommandFactory, Parser};
use moqt_build::cli::{Cli, Command};
use moqt_build::cmd::build::compute_clean_flags;
use moqt_build::platform::Target;
use moqt_build::task::CleanFlags;

// =============================================================================
// Info Commands
// =============================================================================

#[test]
fn cli_version_alias() {
    let cli = Cli::try_parse_from(["moqt-build", "-v"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn cli_info_commands() {
    for (arg, expected) in [("options", "Options"), ("targets", "Targets")] {
        let cli = Cli::try_parse_from(["moqt-build", arg]).unwrap();
        assert_eq!(format!("{:?}", cli.command), format!("Some({expected})"));
    }
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

// =============================================================================
// Target Commands
// =============================================================================

#[test]
fn cli_every_target_accepted() {
    for target in Target::ALL {
        let cli = Cli::try_parse_from(["moqt-build", "build", target.as_str()]).unwrap();
        let Some(Command::Build(args)) = cli.command else {
            panic!("expected build command for {target}");
        };
        assert_eq!(args.target.target, target);
    }
}

#[test]
fn cli_build_help_lists_targets() {
    let mut cmd = Cli::command();
    let help = cmd
        .find_subcommand_mut("build")
        .unwrap()
        .render_help()
        .to_string();
    for target in Target::names() {
        assert!(help.contains(target), "{target} missing from:\n{help}");
    }
}

#[test]
fn cli_build_new_implies_all_clean_flags() {
    let cli = Cli::try_parse_from(["moqt-build", "build", "android", "-n"]).unwrap();
    let Some(Command::Build(args)) = cli.command else {
        panic!("expected build command");
    };
    assert_eq!(compute_clean_flags(&args), CleanFlags::all());
}

#[test]
fn cli_build_individual_clean_flags() {
    let cli = Cli::try_parse_from([
        "moqt-build",
        "build",
        "ios",
        "--redownload",
        "--rebuild",
    ])
    .unwrap();
    let Some(Command::Build(args)) = cli.command else {
        panic!("expected build command");
    };
    assert_eq!(
        compute_clean_flags(&args),
        CleanFlags::REDOWNLOAD | CleanFlags::REBUILD
    );
}

#[test]
fn cli_package_rejects_build_flags() {
    let result = Cli::try_parse_from(["moqt-build", "package", "ios", "--rebuild"]);
    assert!(result.is_err());
}

// =============================================================================
// Global Options
// =============================================================================

#[test]
fn cli_log_level_out_of_range() {
    assert!(Cli::try_parse_from(["moqt-build", "-l", "7", "targets"]).is_err());
}

#[test]
fn cli_repeated_set_options() {
    let cli = Cli::try_parse_from([
        "moqt-build",
        "--no-default-config",
        "-s",
        "canary/push=false",
        "--set",
        "tools/cxx=/usr/bin/g++",
        "canary",
    ])
    .unwrap();

    assert!(cli.global.no_default_config);
    assert_eq!(
        cli.global.to_config_overrides(),
        ["canary/push=false", "tools/cxx=/usr/bin/g++"]
    );
}
