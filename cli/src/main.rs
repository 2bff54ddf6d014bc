use anyhow::Result;
use clap::{Parser, Subcommand};
use search_core::{DocumentStatus, REQUEST_WINDOW_CAPACITY};
use searcher::{load_engine, replay_queries, resolve_stop_words, write_match, write_search};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "searcher")]
#[command(about = "Rank short text documents with TF-IDF and plus/minus query words", long_about = None)]
struct Cli {
    /// Input path (JSON/JSONL file or directory)
    #[arg(long, global = true, default_value = "./docs")]
    input: PathBuf,
    /// Space-separated stop words; falls back to SEARCHER_STOP_WORDS
    #[arg(long, global = true)]
    stop_words: Option<String>,
    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top documents for a query
    Search {
        #[arg(long)]
        query: String,
        /// actual, irrelevant, banned or removed
        #[arg(long, default_value = "actual")]
        status: DocumentStatus,
        #[arg(long, default_value_t = 2)]
        page_size: usize,
    },
    /// Show which query words a document contains
    Match {
        #[arg(long)]
        query: String,
        #[arg(long)]
        id: i32,
    },
    /// Replay a file of queries through the request window
    Replay {
        /// One query per line
        #[arg(long)]
        queries: PathBuf,
        #[arg(long, default_value = "actual")]
        status: DocumentStatus,
        #[arg(long, default_value_t = REQUEST_WINDOW_CAPACITY)]
        window: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let stop_words = resolve_stop_words(cli.stop_words);
    let engine = load_engine(&cli.input, stop_words.as_deref())?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Search { query, status, page_size } => {
            write_search(&engine, &query, status, page_size, cli.json, &mut stdout)?;
        }
        Commands::Match { query, id } => {
            write_match(&engine, &query, id, cli.json, &mut stdout)?;
        }
        Commands::Replay { queries, status, window } => {
            let reader = BufReader::new(File::open(&queries)?);
            let summary = replay_queries(&engine, reader, status, window)?;
            tracing::info!(requests = summary.requests, rejected = summary.rejected, "replay complete");
            if cli.json {
                serde_json::to_writer(&mut stdout, &summary)?;
                writeln!(stdout)?;
            } else {
                writeln!(stdout, "Total empty requests: {}", summary.no_result_requests)?;
            }
        }
    }
    Ok(())
}
