use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::logging::LogDestination;

/// Print PDFs on a 58 mm receipt printer through the SII URL Print Agent.
#[derive(Debug, Parser)]
#[command(name = "quickprint", version, about)]
pub struct Cli {
    /// Configuration file (RON). Defaults to quickprint.ron in the data directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::File, global = true)]
    pub log: LogDestination,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive print session reading commands from stdin (default).
    Session,
    /// Show stored print history, newest first.
    History {
        /// Print the raw stored records as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Remove all stored print history.
    ClearHistory,
    /// Record an agent callback URL in the stored history.
    Callback { url: String },
    /// Show the effective configuration.
    Config,
}
