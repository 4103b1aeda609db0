use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::extract::{
    DEFAULT_PROGRESS_EVERY, ExtractOptions, RecordCategory, RecordCounts, RunSummary,
    run_extraction,
};
use crate::source::{GitLogCommand, LineSource, LogFile};
use crate::store::{JsonStore, RunRecord, rebuild_chain, recount};
use crate::utils::{get_store_dir, repo_name_from_path};

#[derive(Parser)]
#[command(name = "git-history-miner")]
#[command(version = "0.1.0")]
#[command(
    about = "Mine git history into commit, DAG, revision and sign-off records",
    long_about = None
)]
pub struct Cli {
    /// Store directory (defaults to $GIT_MINER_STORE, then the platform data directory)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run `git log` in a repository and store its history
    Mine {
        /// Path to the repository
        repo_path: PathBuf,
        /// Name recorded for the repository (defaults to the directory name)
        #[arg(long)]
        repo_name: Option<String>,
        /// Revision argument passed to git log, repeatable (defaults to --all)
        #[arg(long = "rev", allow_hyphen_values = true)]
        revisions: Vec<String>,
        /// Log progress every N commits (0 disables)
        #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
        progress_every: usize,
    },
    /// Import a saved `git log` output file
    Import {
        /// Log file written with the miner's log format
        log_file: PathBuf,
        /// Name recorded for the repository
        #[arg(long)]
        repo_name: String,
        /// Log progress every N commits (0 disables)
        #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
        progress_every: usize,
    },
    /// Fill parent and child counts from the DAG table
    Recount,
    /// Rebuild sign-off chains from stored commit messages
    Chain,
    /// Show row counts for every table
    Stats,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    run_with(cli)
}

pub fn run_with(cli: Cli) -> Result<()> {
    let Some(command) = &cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let store_dir = get_store_dir(cli.store.as_deref())?;
    let mut store = JsonStore::open(&store_dir)
        .with_context(|| format!("Failed to open store at {}", store_dir.display()))?;

    match command {
        Commands::Mine { repo_path, repo_name, revisions, progress_every } => {
            let repo = match repo_name {
                Some(name) => name.clone(),
                None => repo_name_from_path(repo_path)?,
            };
            let mut source = GitLogCommand::new(repo_path)?.with_revisions(revisions.clone());
            let summary = ingest(&mut source, &mut store, &repo, *progress_every)?;
            print_run(&repo, &summary);
        }
        Commands::Import { log_file, repo_name, progress_every } => {
            let mut source = LogFile::new(log_file);
            let summary = ingest(&mut source, &mut store, repo_name, *progress_every)?;
            print_run(repo_name, &summary);
        }
        Commands::Recount => {
            let summary = recount(&store)?;
            println!(
                "Recounted {} commits over {} DAG edges ({} parents not yet mined)",
                summary.commits, summary.edges, summary.dangling_parents
            );
        }
        Commands::Chain => {
            let entries = rebuild_chain(&store)?;
            println!("Rebuilt {} chain entries", entries);
        }
        Commands::Stats => show_stats(&store, &store_dir)?,
    }

    Ok(())
}

/// Extract from `source` into `store` and log the run in the manifest.
fn ingest(
    source: &mut dyn LineSource,
    store: &mut JsonStore,
    repo: &str,
    progress_every: usize,
) -> Result<RunSummary> {
    let options = ExtractOptions { repo: repo.to_string(), progress_every };
    let summary = run_extraction(source, store, &options)?;

    store.record_run(RunRecord {
        repo: repo.to_string(),
        finished_at: Utc::now(),
        blocks: summary.scan.blocks,
        written: summary.written,
    })?;

    Ok(summary)
}

fn print_counts(counts: &RecordCounts) {
    for category in RecordCategory::FLUSH_ORDER {
        println!("  {}: {}", category, counts.get(category));
    }
}

fn print_run(repo: &str, summary: &RunSummary) {
    println!("Mined {}", repo);
    println!("  Blocks scanned: {}", summary.scan.blocks);
    println!("  New commits: {}", summary.scan.extracted);
    println!("  Already known: {}", summary.scan.skipped);
    println!("Rows written:");
    print_counts(&summary.written);
}

fn show_stats(store: &JsonStore, store_dir: &Path) -> Result<()> {
    let counts = store.counts()?;

    println!("Git History Store Statistics");
    println!("============================");
    println!("Store: {}", store_dir.display());
    print_counts(&counts);

    let manifest = store.manifest();
    println!();
    println!("Runs recorded: {}", manifest.runs.len());
    if let Some(last) = manifest.runs.last() {
        println!(
            "Last run: {} at {}",
            last.repo,
            last.finished_at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    Ok(())
}
