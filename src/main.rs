//! Conch shell entry point: argument parsing, logging setup, command dispatch.

use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::{debug, error};

use conch_shell::api::HttpConchClient;
use conch_shell::app::cli::{Args, Command, ProfileCommand, COMMON_COMMANDS};
use conch_shell::app::logging::{init_tracing, parse_log_level};
use conch_shell::commands::{self, profile};
use conch_shell::config::types::default_log_level;
use conch_shell::config::{default_config_path, load_config, peek_log_level};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse arguments with custom error handling
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            use clap::error::ErrorKind;
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                print!("{}", err);
                std::process::exit(0);
            }
            eprintln!("{}", err);
            std::process::exit(2);
        }
    };

    if args.command.is_none() {
        eprintln!("ERROR: No command specified. You must specify a command.");
        eprintln!();
        let _ = Args::command().print_help();
        eprintln!("{}", COMMON_COMMANDS);
        std::process::exit(1);
    }

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        eprintln!("Error: {}", e);
        for cause in e.chain().skip(1) {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);

    // Priority: 1. --log-level flag / CONCH_LOG_LEVEL, 2. config file, 3. default (warn)
    // Resolved before loading so migration and load events reach the subscriber.
    let requested = args
        .log_level
        .clone()
        .or_else(|| peek_log_level(&config_path))
        .unwrap_or_else(default_log_level);
    let filter = match parse_log_level(&requested) {
        Some(filter) => filter,
        None => {
            eprintln!(
                "Invalid log level '{}'. Using WARN. Valid levels: TRACE, DEBUG, INFO, WARN, ERROR, CRITICAL",
                requested
            );
            "warn"
        }
    };
    init_tracing(filter);
    debug!("Using config file {:?}", config_path);
    let mut config = load_config(Some(&config_path)).await?;

    let json = args.json || config.shell.default_output.eq_ignore_ascii_case("json");

    let Some(command) = args.command else {
        return Ok(());
    };

    match command {
        Command::Login { url, user, password, name } => {
            profile::login(&mut config, &config_path, &url, &user, password, &name).await
        }
        Command::Profile { action } => match action {
            ProfileCommand::List => profile::list(&config, json),
            ProfileCommand::SetActive { name } => profile::set_active(&mut config, &config_path, &name).await,
            ProfileCommand::Delete { name } => profile::delete(&mut config, &config_path, &name).await,
        },
        command => {
            let active = config.resolve(args.profile.as_deref(), args.api_url.as_deref(), args.token.as_deref())?;
            debug!("Using profile '{}' at {}", active.name, active.api_url);
            let timeout = Duration::from_secs_f64(config.shell.request_timeout.max(1.0));
            let client = HttpConchClient::new(&active.api_url, active.token.clone(), timeout)?;
            commands::run(&client, command, json).await
        }
    }
}
