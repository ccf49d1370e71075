use crate::export::ReportFormat;
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for timeclock
/// CLI application to track work sessions and breaks per user
#[derive(Parser)]
#[command(
    name = "timeclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Clock in/out, track breaks and report worked time per user",
    long_about = None
)]
pub struct Cli {
    /// Override the session store path (`.json` selects the JSON backend)
    #[arg(global = true, long = "store")]
    pub store: Option<String>,

    /// User identity (defaults to $USER / $USERNAME)
    #[arg(global = true, long = "user")]
    pub user: Option<String>,

    /// Display name recorded on first use (defaults to the user identity)
    #[arg(global = true, long = "name")]
    pub name: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ClockAction {
    In,
    Out,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BreakAction {
    Start,
    End,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the session store and configuration
    Init,

    /// Show the configuration
    Config {
        /// Print the current configuration to stdout
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Clock in or out
    Clock {
        /// `in` or `out`
        #[arg(value_enum)]
        action: ClockAction,
    },

    /// Start or end a break
    Break {
        /// `start` or `end`
        #[arg(value_enum)]
        action: BreakAction,
    },

    /// Show your current session
    Status,

    /// Summarize worked and break time for every user who clocked in
    Report {
        /// Output format; inferred from --file when omitted
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,

        /// Output file; the report is printed when omitted
        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Delete all time data (restricted, asks for confirmation)
    Reset,

    /// Print the internal audit log
    Log {
        /// Print rows from the internal log
        #[arg(long = "print", help = "Print rows from the internal log")]
        print: bool,
    },

    /// Create a backup copy of the session store
    Backup {
        /// Destination file path
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Compress the backup (zip)
        #[arg(long)]
        compress: bool,

        /// Overwrite destination without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}
