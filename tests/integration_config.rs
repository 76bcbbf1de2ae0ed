// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the layering of files and overrides with realistic TOML.

use std::path::PathBuf;

use moqt_build::config::Config;
use moqt_build::config::loader::ConfigLoader;
use moqt_build::config::paths::PathKey;
use moqt_build::logging::LogLevel;

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// Loading from TOML strings
// =============================================================================

#[test]
fn config_parse_full() {
    let toml = r#"
[global]
dry = true
output_log_level = 4

[paths]
root = "/work/moqt"
package = "/dist"

[quiche]
bazel_target = "quiche:moqt_all"
extra_bazel_args = ["--jobs=8", "--verbose_failures"]

[bazelisk]
download_url = "https://mirror.example/bazelisk/{version}/{asset}"

[tools]
cxx = "/usr/bin/clang++-18"

[canary]
sign = true
push = false
"#;
    let config = Config::parse(toml).unwrap();

    assert!(config.global.dry);
    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(
        config.paths.get(PathKey::Source).unwrap(),
        PathBuf::from("/work/moqt/_source")
    );
    assert_eq!(
        config.paths.get(PathKey::Package).unwrap(),
        PathBuf::from("/dist")
    );
    assert_eq!(config.quiche.extra_bazel_args, ["--jobs=8", "--verbose_failures"]);
    assert_eq!(
        config.bazelisk.url_for("1.26.0", "linux-arm64"),
        "https://mirror.example/bazelisk/1.26.0/linux-arm64"
    );
    assert_eq!(config.tools.cxx, PathBuf::from("/usr/bin/clang++-18"));
    assert!(config.canary.sign && !config.canary.push);
    assert_eq!(config.canary.commit_prefix, "[canary]");
}

#[test]
fn config_rejects_unknown_section() {
    let err = Config::parse("[build]\njobs = 8\n").unwrap_err();
    assert!(err.to_string().contains("build"), "{err}");
}

#[test]
fn config_rejects_bad_log_level() {
    assert!(Config::parse("[global]\noutput_log_level = 9\n").is_err());
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn config_later_files_win() {
    let dir = tempfile::tempdir().unwrap();
    let base = write(
        &dir,
        "moqt-build.toml",
        "[quiche]\nbazel_target = \"quiche:base\"\nurl = \"https://example.com/quiche\"\n",
    );
    let local = write(&dir, "local.toml", "[quiche]\nbazel_target = \"quiche:local\"\n");

    let config = ConfigLoader::new()
        .add_toml_file_optional(&base)
        .add_toml_file(&local)
        .build()
        .unwrap();

    assert_eq!(config.quiche.bazel_target, "quiche:local");
    assert_eq!(config.quiche.url, "https://example.com/quiche");
}

#[test]
fn config_overrides_beat_files() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "ci.toml", "[canary]\npush = true\n[global]\ndry = false\n");

    let config = ConfigLoader::new()
        .add_toml_file(&file)
        .apply_overrides(&[
            "canary/push=false".to_string(),
            "global/dry=true".to_string(),
            format!("paths/root={}", dir.path().display()),
        ])
        .unwrap()
        .build()
        .unwrap();

    assert!(!config.canary.push);
    assert!(config.global.dry);
    assert_eq!(
        config.paths.get(PathKey::VersionFile).unwrap(),
        dir.path().join("VERSION")
    );
}

#[test]
fn config_missing_optional_file_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let loader = ConfigLoader::new().add_toml_file_optional(dir.path().join("moqt-build.toml"));

    assert!(loader.loaded_files().is_empty());
    let config = loader.build().unwrap();
    assert_eq!(config.quiche.bazel_target, "quiche:moqt");
}

#[test]
fn config_missing_required_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = ConfigLoader::new()
        .add_toml_file(dir.path().join("absent.toml"))
        .build();
    assert!(result.is_err());
}

#[test]
fn config_malformed_override_rejected() {
    let result = ConfigLoader::new().apply_overrides(&["quiche.url=x".to_string()]);
    assert!(result.is_err());
}

#[test]
fn config_options_listing() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigLoader::new()
        .apply_overrides(&[format!("paths/root={}", dir.path().display())])
        .unwrap()
        .build()
        .unwrap();

    let options = config.format_options();
    let keys: Vec<_> = options
        .iter()
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert!(keys.contains(&"quiche/bazel_target"), "{keys:?}");
    assert!(keys.contains(&"canary/commit_prefix"), "{keys:?}");
    assert!(keys.windows(2).all(|w| w[0] <= w[1]), "{keys:?}");
    assert!(
        options
            .iter()
            .any(|line| line.ends_with("= https://quiche.googlesource.com/quiche"))
    );
}
