// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Config --> Command Dispatch
//!   Build | Package | Test | Clean | Canary | Targets | Options
//! ```

use std::process::ExitCode;

use moqt_build::cli::global::GlobalOptions;
use moqt_build::cli::{self, Command};
use moqt_build::cmd::build::{run_build_command, run_package_command, run_test_command};
use moqt_build::cmd::canary::run_canary_command;
use moqt_build::cmd::clean::run_clean_command;
use moqt_build::cmd::config::run_options_command;
use moqt_build::cmd::targets::run_targets_command;
use moqt_build::config::loader::ConfigLoader;
use moqt_build::config::types::GlobalConfig;
use moqt_build::config::{Config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use moqt_build::error::Result;
use moqt_build::logging::init_logging;
use moqt_build::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();
    let loaded = load_config(&cli.global);

    let log_config = match &loaded {
        Ok(loaded) => log_config_from(&loaded.config.global),
        Err(_) => build_log_config(&cli.global),
    };
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, loaded).await
}

/// Effective configuration and the files it was read from.
struct LoadedConfig {
    config: Config,
    files: Vec<String>,
}

fn log_config_from(global: &GlobalConfig) -> LogConfig {
    LogConfig::builder()
        .with_console_level(global.output_log_level)
        .with_file_level(global.file_log_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .with_json_file(global.log_json)
        .build()
}

/// Logging from the command line alone, used when the configuration
/// cannot be loaded.
fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli, loaded: Result<LoadedConfig>) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Targets) => run_targets_command().await,
        Some(command) => match loaded {
            Ok(loaded) => run_configured(command, &loaded).await,
            Err(e) => Err(e.context("failed to load configuration")),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_configured(command: &Command, loaded: &LoadedConfig) -> Result<()> {
    let config = &loaded.config;
    match command {
        Command::Options => {
            run_options_command(config, &loaded.files);
            Ok(())
        }
        Command::Build(args) => run_build_command(args, config).await,
        Command::Package(args) => run_package_command(args, config).await,
        Command::Test(args) => run_test_command(args, config).await,
        Command::Clean(args) => run_clean_command(args, config).await,
        Command::Canary(args) => run_canary_command(args, config).await,
        Command::Version | Command::Targets => Ok(()),
    }
}

fn handle_version_command() {
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
}

fn load_config(global: &GlobalOptions) -> Result<LoadedConfig> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    let loader = loader
        .with_env_prefix(ENV_PREFIX)
        .apply_overrides(&global.to_config_overrides())?;

    let files = loader.format_loaded_files();
    let config = loader.build()?;
    Ok(LoadedConfig { config, files })
}
