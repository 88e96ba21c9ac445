use std::path::PathBuf;

use clap::Parser;

use super::config::YieldMode;
use super::logging::LogDestination;

/// Word frequency dashboard for the terminal.
#[derive(Debug, Parser)]
#[command(name = "wordfreq", version, about)]
pub struct Cli {
    /// Files to analyze, one request per file. Reads stdin when empty.
    pub files: Vec<PathBuf>,

    /// RON config file (defaults to ./wordfreq.ron when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Treat every stdin line as a request that supersedes the previous one.
    #[arg(long, conflicts_with = "files")]
    pub interactive: bool,

    /// Submit each request this many times in a row.
    #[arg(
        long,
        default_value_t = 1,
        conflicts_with = "interactive",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub repeat: u32,

    #[arg(long)]
    pub initial_chunk: Option<usize>,

    #[arg(long)]
    pub min_chunk: Option<usize>,

    #[arg(long)]
    pub max_chunk: Option<usize>,

    /// Chunk round trip the size controller aims for.
    #[arg(long)]
    pub target_latency_ms: Option<u64>,

    #[arg(long, value_enum)]
    pub yield_mode: Option<YieldMode>,

    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,

    /// Log run progress at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}
