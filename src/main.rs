use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;

mod cli;
mod commands;
mod domain;
mod library;
mod services;

use cli::Cli;
use commands::{handle_discovery_commands, handle_lifecycle_commands};
use library::BridgeLibrary;
use services::output::error;
use services::settings::{api_version, bridge_program, load_settings};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if cli.json {
        colored::control::set_override(false);
    }

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let settings = load_settings(cli.config.as_deref())?;
    let library = BridgeLibrary::new(bridge_program(cli, &settings));
    let api = api_version(cli, &settings);
    log::debug!("api version {}", api.as_str());

    if handle_discovery_commands(cli, &library, api)? {
        return Ok(ExitCode::SUCCESS);
    }
    handle_lifecycle_commands(cli, &library, api, &settings)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let _ = builder.try_init();
}
