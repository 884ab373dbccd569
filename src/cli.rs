use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "drivedrop-pricing", version, about = "DriveDrop progressive pricing service")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the pricing server (default)
    Start,

    /// Price a shipment request read from a JSON file or stdin
    Estimate {
        /// Request JSON file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Resolve through the backend quote service
        #[arg(short, long)]
        quote: bool,

        /// Bearer token for the backend (defaults to backend.service_token)
        #[arg(short, long)]
        token: Option<String>,

        /// Pickup date (YYYY-MM-DD) forwarded with the quote
        #[arg(long)]
        pickup_date: Option<NaiveDate>,

        /// Delivery date (YYYY-MM-DD) forwarded with the quote
        #[arg(long)]
        delivery_date: Option<NaiveDate>,
    },

    /// Stream requests from stdin, one JSON per line, publishing debounced prices
    Watch {
        /// Bearer token for the backend (defaults to backend.service_token)
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Test configuration file validity
    Test,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (with secrets masked)
    Show,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}
