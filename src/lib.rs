//! Git History Miner - turn repository history into relational records
//!
//! This library consumes the output of a sentinel-formatted `git log --numstat` run and
//! produces normalized records for later analysis. It supports:
//!
//! - Splitting the log stream into per-commit blocks and parsing their fixed header
//! - Building the parent/child revision graph, including merges and root commits
//! - Per-path add/remove statistics, including binary changes without counts
//! - Repository membership and ref/tag decorations for every commit seen
//! - Sign-off, ack, review, test and cc trailer chains with per-type ordinals
//! - Skipping full extraction for commits already present in the store
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use git_history_miner::{ExtractOptions, GitLogCommand, JsonStore, run_extraction};
//!
//! let mut store = JsonStore::open(Path::new("/tmp/git-history"))?;
//! let mut source = GitLogCommand::new(Path::new("/src/linux"))?;
//! let summary = run_extraction(&mut source, &mut store, &ExtractOptions::new("linux"))?;
//! println!("Extracted {} new commits", summary.scan.extracted);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod error;
pub mod extract;
pub mod models;
pub mod parsers;
pub mod source;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use error::ExtractError;
pub use extract::{DedupGate, ExtractOptions, Extractor, RecordBatch, RunSummary, run_extraction};
pub use models::{ChainEntry, ChainType, Commit, DagEdge, RefTag, RepoAssociation, Revision};
pub use source::{GitLogCommand, LineSource, LogFile};
pub use store::{JsonStore, RecordStore};
