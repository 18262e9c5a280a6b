//! `flightinfo` - CLI for flight status lookups
//!
//! This binary resolves flights, routes and airports through the configured
//! data sources and prints the merged result.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use flightinfo::cli::render::{render_airport, render_flight, render_route};
use flightinfo::cli::{Cli, Command, ConfigCommand};
use flightinfo::{init_logging, Config, Error, FlightService, RouteResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Flight(cmd) => {
            let service = FlightService::from_config(&config)?;
            let result = service.resolve_flight(&cmd.number).await;
            report(result, cmd.json, render_flight)
        }
        Command::Route(cmd) => {
            let service = FlightService::from_config(&config)?;
            match service.resolve_route(&cmd.from, &cmd.to).await? {
                RouteResult::Flights(flights) => {
                    if cmd.json {
                        print_json(&flights)?;
                    } else {
                        print!("{}", render_route(&cmd.from, &cmd.to, &flights));
                    }
                    Ok(())
                }
                RouteResult::Unsupported => {
                    println!("Route search is not available: configure schedule.timetable_path");
                    Ok(())
                }
            }
        }
        Command::Airport(cmd) => {
            let service = FlightService::from_config(&config)?;
            let result = service.resolve_airport(&cmd.query).await;
            report(result, cmd.json, render_airport)
        }
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a lookup result; "not found" is an answer, not a failure.
fn report<T: Serialize>(
    result: flightinfo::Result<T>,
    json: bool,
    render: fn(&T) -> String,
) -> anyhow::Result<()> {
    match result {
        Ok(value) if json => print_json(&value),
        Ok(value) => {
            print!("{}", render(&value));
            Ok(())
        }
        Err(Error::NoDataFound { query }) => {
            if json {
                println!("null");
            } else {
                println!("Not found: {query}");
            }
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                let mut shown = config.clone();
                if shown.live.api_key.is_some() {
                    shown.live.api_key = Some("<redacted>".to_string());
                }
                print_json(&shown)?;
            } else {
                let precedence: Vec<String> =
                    config.query.precedence.iter().map(ToString::to_string).collect();

                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Query]");
                println!("  Timeout (ms):       {}", config.query.timeout_ms);
                println!("  Precedence:         {}", precedence.join(", "));
                println!();
                println!("[Schedule]");
                println!("  Enabled:            {}", config.schedule.enabled);
                match &config.schedule.timetable_path {
                    Some(path) => println!("  Timetable:          {}", path.display()),
                    None => println!("  Base URL:           {}", config.schedule.base_url),
                }
                println!();
                println!("[Live]");
                println!("  Enabled:            {}", config.live.enabled);
                println!("  Base URL:           {}", config.live.base_url);
                println!(
                    "  API key:            {}",
                    if config.live_api_key().is_some() { "set" } else { "not set" }
                );
                println!();
                println!("[Airports]");
                println!("  Enabled:            {}", config.airports.enabled);
                println!("  Base URL:           {}", config.airports.base_url);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
