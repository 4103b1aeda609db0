//! History extraction for sentinel-delimited `git log` streams
//!
//! The pipeline runs strictly in stream order:
//!
//! 1. [`Blocks`](crate::parsers::Blocks) splits the lines into per-commit blocks
//! 2. [`DedupGate`] decides whether a block is a new commit or an already-known one
//! 3. New commits go through header, diffstat and trailer parsing
//! 4. All rows accumulate in a [`RecordBatch`], flushed once per category at the end
//!
//! Repository and ref associations are recorded for every block, since the same commit
//! can be reachable from several repositories and refs.

pub mod batch;
pub mod dedup;
pub mod pipeline;

pub use batch::{RecordBatch, RecordCategory, RecordCounts};
pub use dedup::{DedupGate, Extraction};
pub use pipeline::{
    DEFAULT_PROGRESS_EVERY, ExtractOptions, Extractor, RunSummary, ScanStats, run_extraction,
};
