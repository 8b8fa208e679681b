//! Command-line interface.

use clap::Parser;
use std::path::PathBuf;

/// A terminal dashboard for stock and crypto prices.
///
/// Polls Finnhub for equities and Binance for crypto pairs, and lets you
/// pick which symbols to watch, add new ones, or switch to a built-in
/// profile.
#[derive(Parser, Debug, Clone)]
#[command(name = "pricewatch")]
#[command(version)]
#[command(about = "A terminal dashboard for stock and crypto prices", long_about = None)]
pub struct Args {
    /// Profile file with one symbol per line
    ///
    /// Blank lines are ignored and symbols are uppercased.
    /// Without it the built-in list AAPL, GOOGL, MSFT, BTCUSDT, ETHUSDT is used.
    #[arg(short = 'p', long, env = "PRICEWATCH_PROFILE")]
    pub profile: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "PRICEWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// File holding the Finnhub API key (equity quotes are disabled without it)
    #[arg(short = 'k', long, env = "PRICEWATCH_KEY_FILE")]
    pub key_file: Option<PathBuf>,

    /// Seconds between quote refreshes (minimum 1)
    #[arg(short = 'd', long)]
    pub delay: Option<f64>,

    /// HTTP timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Directory for log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub sample_config: bool,
}

impl Args {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Default log level for this crate.
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
