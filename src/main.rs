use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use podcasts::cli::{Cli, Commands};
use podcasts::config::Config;
use podcasts::domain::outcome_header;
use podcasts::errors::{PodcastError, PodcastResult};
use podcasts::services::{FeedService, RunOptions, RunService, ScanMode};
use podcasts::sources::HttpFetcher;
use podcasts::storage::{FeedListFile, FeedListRepository, ScratchDir};

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("{}", error_message(&e));
        std::process::exit(1);
    }
}

fn error_message(e: &PodcastError) -> String {
    if e.is_fatal() {
        format!(
            "Error: {}\nRun aborted: the scratch directory is unusable, no report was written.",
            e
        )
    } else {
        format!("Error: {}", e)
    }
}

/// Diagnostics go to stderr so stdout only carries progress and the report.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> PodcastResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    let feed_list = FeedListFile::new(config.feed_list_path());

    match cli.command {
        Commands::Run {
            days,
            output,
            timeout,
            full_scan,
        } => {
            let options = RunOptions {
                days: days.unwrap_or(config.days),
                mode: if full_scan {
                    ScanMode::FullScan
                } else {
                    ScanMode::StopAtFirstStale
                },
            };
            let timeout = timeout.map(Duration::from_secs).unwrap_or(config.timeout);
            cmd_run(&config, feed_list, options, timeout, output)
        }
        Commands::Add { url } => cmd_add(&url, feed_list, config.timeout),
        Commands::List => cmd_list(feed_list),
    }
}

fn cmd_run(
    config: &Config,
    feed_list: FeedListFile,
    options: RunOptions,
    timeout: Duration,
    output: Option<PathBuf>,
) -> PodcastResult<()> {
    let fetcher = HttpFetcher::new(timeout)?;
    let service = RunService::new(feed_list, &fetcher, ScratchDir::new(&config.home));

    println!("{}", outcome_header());
    let summary = service.run(options, |outcome| println!("{}", outcome))?;
    println!("\n{:6.2}s elapsed\n", summary.elapsed.as_secs_f64());

    match output {
        Some(path) => {
            fs::write(&path, &summary.report.text).map_err(|source| PodcastError::Write {
                path: path.clone(),
                source,
            })?;
            println!(
                "Wrote {} feeds with downloads to {}",
                summary.report.included.len(),
                path.display()
            );
        }
        None => print!("{}", summary.report.text),
    }

    Ok(())
}

fn cmd_add(url: &str, feed_list: FeedListFile, timeout: Duration) -> PodcastResult<()> {
    let fetcher = HttpFetcher::new(timeout)?;
    let service = FeedService::new(feed_list, &fetcher);

    println!("Checking feed: {}", url);

    match service.add(url) {
        Ok(url) => {
            println!("Feed added: {}", url);
            Ok(())
        }
        Err(PodcastError::FeedAlreadyExists(_)) => {
            println!("Feed already exists: {}", url);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn cmd_list(feed_list: FeedListFile) -> PodcastResult<()> {
    let path = feed_list.path();
    let feeds = feed_list.get_all()?;

    if feeds.is_empty() {
        println!("No feeds configured in {}", path.display());
        return Ok(());
    }

    println!("Configured feeds ({}):\n", path.display());
    for url in feeds {
        println!("  {}", url);
    }

    Ok(())
}
