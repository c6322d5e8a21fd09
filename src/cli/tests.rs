// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::auth::Provider;
use crate::cli::auth::SessionSubcommand;
use crate::cli::global::GlobalOptions;
use crate::cli::{Cli, Command};
use crate::config::loader::ConfigLoader;
use crate::logging::LogLevel;
use clap::Parser;

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["amandus", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "amandus",
        "-l",
        "5",
        "-w",
        "/srv/repos",
        "clone",
        "https://github.com/team/repo",
    ])
    .unwrap();
    insta::assert_debug_snapshot!(cli, @r#"
    Cli {
        global: GlobalOptions {
            configs: [],
            log_level: Some(
                5,
            ),
            file_log_level: None,
            log_file: None,
            workspace_root: Some(
                "/srv/repos",
            ),
            no_default_config: false,
        },
        command: Some(
            Clone(
                RepoArgs {
                    url: "https://github.com/team/repo",
                },
            ),
        ),
    }
    "#);
}

#[test]
fn test_parse_log_level_out_of_range() {
    assert!(Cli::try_parse_from(["amandus", "-l", "7", "version"]).is_err());
}

#[test]
fn test_parse_save() {
    let cli = Cli::try_parse_from([
        "amandus",
        "save",
        "--file",
        "github.com/team/repo/docs/a.md",
        "--content-file",
        "a.md",
        "--branch",
        "feature-x",
        "--session",
        "tok",
    ])
    .unwrap();
    let Some(Command::Save(args)) = cli.command else {
        panic!("expected save");
    };
    assert_eq!(args.file, "github.com/team/repo/docs/a.md");
    assert_eq!(args.branch, "feature-x");
    assert_eq!(args.message, None);
    assert_eq!(args.session.token, "tok");
}

#[test]
fn test_parse_provider_argument() {
    let cli = Cli::try_parse_from(["amandus", "login-url", "GitLab"]).unwrap();
    let Some(Command::LoginUrl(args)) = cli.command else {
        panic!("expected login-url");
    };
    assert_eq!(args.provider, Provider::GitLab);

    assert!(Cli::try_parse_from(["amandus", "login-url", "gitea"]).is_err());
}

#[test]
fn test_parse_session_issue() {
    let cli = Cli::try_parse_from([
        "amandus", "session", "issue", "--id", "7", "-u", "alice",
    ])
    .unwrap();
    let Some(Command::Session(args)) = cli.command else {
        panic!("expected session");
    };
    let SessionSubcommand::Issue(issue) = args.subcommand;
    assert_eq!(issue.id, "7");
    assert_eq!(issue.username, "alice");
    assert_eq!(issue.email, None);
}

#[test]
fn test_overrides_take_precedence() {
    let options = GlobalOptions {
        log_level: Some(4),
        workspace_root: Some("/srv/repos".into()),
        ..GlobalOptions::default()
    };
    let loader = ConfigLoader::new().add_toml_str(
        "[global]\noutput_log_level = 1\nfile_log_level = 1\n\n[workspace]\nroot = \"elsewhere\"\n",
    );
    let config = options.apply_overrides(loader).unwrap().build().unwrap();

    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(config.global.file_log_level, LogLevel::DEBUG);
    assert_eq!(config.workspace.root, std::path::PathBuf::from("/srv/repos"));
}

#[test]
fn test_file_log_level_kept_separate() {
    let options = GlobalOptions {
        log_level: Some(2),
        file_log_level: Some(6),
        ..GlobalOptions::default()
    };
    let config = options
        .apply_overrides(ConfigLoader::new())
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.global.output_log_level, LogLevel::WARN);
    assert_eq!(config.global.file_log_level, LogLevel::DUMP);
}
