use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crawlstore")]
#[command(about = "Inspect and operate a crawlstore directory", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $CRAWLSTORE_CONFIG or config/crawlstore.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store directory, overrides `store.path`
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the store and its partitions if missing
    Init,
    /// Print partition counts and counters as JSON
    Stats,
    /// Print the effective configuration as TOML
    Config,
    /// Append a request payload to the queue
    Enqueue {
        payload: String,
    },
    /// Pop the oldest request payload from the queue
    Dequeue,
    /// Mark a request fingerprint as visited
    Visit {
        id: u64,
    },
    /// Check whether a request fingerprint was visited
    Visited {
        id: u64,
    },
    /// Read or write the cookie cache
    Cookies {
        #[command(subcommand)]
        command: CookieCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CookieCommands {
    /// Print cookies stored for an origin
    Get { origin: String },
    /// Replace cookies stored for an origin
    Set { origin: String, value: String },
}
