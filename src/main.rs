// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Clone | Pull | State | SwitchBranch | Save
//!   LoginUrl | Authorize | Repos | Session | Options | ConfigFiles
//! ```

use std::process::ExitCode;

use amandus::cli::global::GlobalOptions;
use amandus::cli::{self, Command};
use amandus::cmd::auth::{
    run_authorize_command, run_login_url_command, run_repos_command, run_session_command,
};
use amandus::cmd::config::{run_config_files_command, run_options_command};
use amandus::cmd::repo::{
    run_clone_command, run_pull_command, run_save_command, run_state_command,
    run_switch_branch_command,
};
use amandus::config::Config;
use amandus::logging::{LogConfig, init_logging};
use amandus::service::Amandus;
use amandus::sync::SyncEngine;
use amandus::workspace::WorkspaceLocator;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    if matches!(cli.command, Some(Command::Version)) {
        handle_version_command();
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&build_log_config(&config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config).await
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            config
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    let engine = || SyncEngine::new(WorkspaceLocator::new(&config.workspace.root));

    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => {
            run_options_command(config);
            Ok(())
        }
        Some(Command::ConfigFiles) => cli.global.config_loader().map(|loader| {
            run_config_files_command(&loader.format_loaded_files());
        }),
        Some(Command::Clone(args)) => run_clone_command(args, &engine()),
        Some(Command::Pull(args)) => run_pull_command(args, &engine()),
        Some(Command::State(args)) => run_state_command(args, &engine()),
        Some(Command::SwitchBranch(args)) => run_switch_branch_command(args, &engine()),
        Some(Command::Save(args)) => {
            service(config).and_then(|amandus| run_save_command(args, &amandus))
        }
        Some(Command::LoginUrl(args)) => {
            service(config).and_then(|amandus| run_login_url_command(args, &amandus))
        }
        Some(Command::Authorize(args)) => match service(config) {
            Ok(amandus) => run_authorize_command(args, &amandus).await,
            Err(e) => Err(e),
        },
        Some(Command::Repos(args)) => match service(config) {
            Ok(amandus) => run_repos_command(args, &amandus).await,
            Err(e) => Err(e),
        },
        Some(Command::Session(args)) => {
            service(config).and_then(|amandus| run_session_command(args, &amandus))
        }
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

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn service(config: &Config) -> amandus::error::Result<Amandus> {
    Ok(Amandus::from_config(config)?)
}

fn load_config(global: &GlobalOptions) -> amandus::error::Result<Config> {
    global.config_loader()?.build()
}
