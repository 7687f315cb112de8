use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "podcasts")]
#[command(about = "Fetch podcast feeds concurrently and print a download script for recent episodes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every feed and print wget commands for recent episodes
    Run {
        /// Look back this many days (overrides PODCASTS_DAYS)
        #[arg(short, long)]
        days: Option<u32>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Per-feed fetch deadline in seconds (overrides PODCASTS_TIMEOUT_SECS)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Check every item instead of stopping at the first old one
        #[arg(long)]
        full_scan: bool,
    },

    /// Add a new feed URL to the feed list
    Add {
        /// Feed URL to add
        url: String,
    },

    /// List all feeds
    List,
}
