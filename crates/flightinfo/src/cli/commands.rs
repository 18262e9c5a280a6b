//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Flight lookup arguments.
#[derive(Debug, Args)]
pub struct FlightCommand {
    /// Flight number, e.g. "FR8123" or "fr 8123"
    pub number: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Route lookup arguments.
#[derive(Debug, Args)]
pub struct RouteCommand {
    /// Departure airport code
    pub from: String,

    /// Arrival airport code
    pub to: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Airport lookup arguments.
#[derive(Debug, Args)]
pub struct AirportCommand {
    /// IATA code or airport name
    pub query: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_command_debug() {
        let cmd = FlightCommand {
            number: "FR8123".to_string(),
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("FR8123"));
    }

    #[test]
    fn test_route_command_debug() {
        let cmd = RouteCommand {
            from: "KRK".to_string(),
            to: "STN".to_string(),
            json: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("KRK"));
        assert!(debug_str.contains("json"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
