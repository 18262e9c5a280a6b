//! Command-line interface for flightinfo.
//!
//! This module provides the CLI structure, command definitions and the plain
//! text rendering used by the `flightinfo` binary.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{AirportCommand, ConfigCommand, FlightCommand, RouteCommand};

/// flightinfo - Look up flight status, routes and airports
///
/// Queries the configured flight data sources, merges what they know into one
/// record, and adds distance, duration and progress figures.
#[derive(Debug, Parser)]
#[command(name = "flightinfo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a flight by number
    Flight(FlightCommand),

    /// List flights between two airports
    Route(RouteCommand),

    /// Look up an airport by code or name
    Airport(AirportCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Config(ConfigCommand::Path),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "flightinfo");
    }

    #[test]
    fn test_verbosity_flags() {
        use crate::logging::Verbosity;

        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(2, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli_with(3, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flight() {
        let cli = Cli::try_parse_from(["flightinfo", "flight", "FR8123", "--json"]).unwrap();
        let Command::Flight(cmd) = cli.command else {
            panic!("expected flight command");
        };
        assert_eq!(cmd.number, "FR8123");
        assert!(cmd.json);
    }

    #[test]
    fn test_parse_route() {
        let cli = Cli::try_parse_from(["flightinfo", "route", "KRK", "STN"]).unwrap();
        let Command::Route(cmd) = cli.command else {
            panic!("expected route command");
        };
        assert_eq!((cmd.from.as_str(), cmd.to.as_str()), ("KRK", "STN"));
        assert!(!cmd.json);
    }

    #[test]
    fn test_parse_route_requires_destination() {
        assert!(Cli::try_parse_from(["flightinfo", "route", "KRK"]).is_err());
    }

    #[test]
    fn test_parse_airport() {
        let cli = Cli::try_parse_from(["flightinfo", "airport", "Luanda"]).unwrap();
        assert!(matches!(cli.command, Command::Airport(_)));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["flightinfo", "config", "validate", "-f", "/tmp/c.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let args = ["flightinfo", "-c", "/custom/config.toml", "flight", "LO281"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let cli = Cli::try_parse_from(["flightinfo", "-vv", "flight", "LO281"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_with_quiet() {
        let cli = Cli::try_parse_from(["flightinfo", "flight", "LO281", "-q"]).unwrap();
        assert!(cli.quiet);
    }
}
