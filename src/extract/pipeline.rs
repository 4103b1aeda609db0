//! Extraction pipeline: line stream in, record batch out.
//!
//! # Error Handling Strategy
//!
//! Unlike line-oriented formats where a bad line can be skipped, block boundaries and
//! header offsets here are positional. A malformed block therefore aborts the run:
//!
//! - **Source failures** (unreadable file, non-zero `git` exit): returned before any
//!   extraction starts, nothing is flushed.
//! - **Malformed blocks**: the whole batch is discarded and the error names the block's
//!   start line.
//! - **Flush failures**: surfaced with the failing category; categories flushed before it
//!   stay written.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::error::ExtractError;
use crate::extract::batch::{RecordBatch, RecordCounts};
use crate::extract::dedup::{DedupGate, Extraction};
use crate::models::{DagEdge, RefTag, RepoAssociation};
use crate::parsers::{
    BlockIdentity, Blocks, ParsedBlock, extract_chain, parse_block, parse_diffstat, parse_identity,
};
use crate::source::LineSource;
use crate::store::RecordStore;

/// Default number of blocks between progress reports
pub const DEFAULT_PROGRESS_EVERY: usize = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub blocks: usize,
    /// Blocks extracted in full (first sighting).
    pub extracted: usize,
    /// Blocks whose commit was already known.
    pub skipped: usize,
}

/// Converts sentinel-delimited log lines into records for one repository.
pub struct Extractor<'a> {
    repo: String,
    gate: DedupGate,
    progress_every: usize,
    on_progress: Option<Box<dyn FnMut(usize) + 'a>>,
}

impl<'a> Extractor<'a> {
    pub fn new(repo: impl Into<String>, gate: DedupGate) -> Self {
        Self { repo: repo.into(), gate, progress_every: 0, on_progress: None }
    }

    /// Call `callback` with the running block count every `every` blocks. Zero disables it.
    pub fn with_progress(mut self, every: usize, callback: impl FnMut(usize) + 'a) -> Self {
        self.progress_every = every;
        self.on_progress = Some(Box::new(callback));
        self
    }

    pub fn gate(&self) -> &DedupGate {
        &self.gate
    }

    pub fn into_gate(self) -> DedupGate {
        self.gate
    }

    /// Scan every block in `lines`.
    ///
    /// Repository and ref associations are recorded for every block. Commits, DAG edges,
    /// revisions and chain entries only for commits the gate has not seen yet.
    pub fn extract(&mut self, lines: &[String]) -> Result<(RecordBatch, ScanStats), ExtractError> {
        let mut batch = RecordBatch::new();
        let mut stats = ScanStats::default();

        for block in Blocks::new(lines) {
            let block = block?;
            let BlockIdentity { id, refs } = parse_identity(&block)?;

            batch
                .repo_associations
                .push(RepoAssociation { repo: self.repo.clone(), commit: id.to_string() });
            batch
                .ref_tags
                .extend(refs.into_iter().map(|name| RefTag { commit: id.to_string(), name }));

            match self.gate.admit(id) {
                Extraction::AssociationsOnly => {
                    debug!("Commit {} already known, recording associations only", id);
                    stats.skipped += 1;
                }
                Extraction::Full => {
                    let ParsedBlock { commit, parents } = parse_block(&block)?;

                    batch.dag_edges.extend(
                        parents
                            .into_iter()
                            .map(|parent| DagEdge { child: commit.id.clone(), parent }),
                    );
                    batch.revisions.extend(parse_diffstat(&commit.id, block.trailer));
                    batch.chain_entries.extend(extract_chain(&commit.id, &commit.message));
                    batch.commits.push(commit);
                    stats.extracted += 1;
                }
            }

            stats.blocks += 1;
            if self.progress_every > 0
                && stats.blocks % self.progress_every == 0
                && let Some(callback) = self.on_progress.as_mut()
            {
                callback(stats.blocks);
            }
        }

        Ok((batch, stats))
    }
}

/// Settings for [`run_extraction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Repository name recorded in every association row.
    pub repo: String,
    pub progress_every: usize,
}

impl ExtractOptions {
    pub fn new(repo: impl Into<String>) -> Self {
        Self { repo: repo.into(), progress_every: DEFAULT_PROGRESS_EVERY }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub scan: ScanStats,
    /// Rows produced by extraction.
    pub produced: RecordCounts,
    /// Rows the store accepted.
    pub written: RecordCounts,
}

/// Read `source`, extract against the commits already in `store`, and flush once.
///
/// # Errors
///
/// Returns an error if:
/// - The source cannot be read or the `git` process fails
/// - A block is malformed (the error names its start line)
/// - The store cannot enumerate known commits or rejects a bulk insert
///
/// Nothing is written unless the whole stream extracts cleanly.
pub fn run_extraction<L, S>(
    source: &mut L,
    store: &mut S,
    options: &ExtractOptions,
) -> Result<RunSummary>
where
    L: LineSource + ?Sized,
    S: RecordStore + ?Sized,
{
    let lines = source.read_lines().context("Failed to read log lines")?;
    let known = store.known_commits().context("Failed to load known commits")?;
    info!("Read {} log lines, {} commits already known", lines.len(), known.len());

    let mut extractor = Extractor::new(options.repo.clone(), DedupGate::new(known))
        .with_progress(options.progress_every, |blocks| info!("Processed {} commits", blocks));
    let (batch, scan) = extractor.extract(&lines)?;
    let produced = batch.counts();

    let written = batch.flush(store)?;
    info!(
        "Extracted {} commits ({} blocks, {} already known) for {}",
        scan.extracted, scan.blocks, scan.skipped, options.repo
    );

    Ok(RunSummary { scan, produced, written })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{END_SENTINEL, START_SENTINEL};

    fn stream(ids: &[&str]) -> Vec<String> {
        let mut lines = Vec::new();
        for id in ids {
            lines.push(START_SENTINEL.to_string());
            lines.push(id.to_string());
            lines.push("4b825dc642cb6eb9a060e54bf8d69288fbee4904".to_string());
            lines.push("A <a@x.com>".to_string());
            lines.push("Mon, 1 Jan 2024 00:00:00 +0000".to_string());
            lines.push("A <a@x.com>".to_string());
            lines.push("Mon, 1 Jan 2024 00:00:00 +0000".to_string());
            lines.push(String::new());
            lines.push(String::new());
            lines.push("subject".to_string());
            lines.push(END_SENTINEL.to_string());
        }
        lines
    }

    #[test]
    fn test_progress_callback_every_k_blocks() {
        let lines = stream(&["a1", "a2", "a3", "a4", "a5"]);
        let mut seen = Vec::new();
        {
            let mut extractor =
                Extractor::new("repo", DedupGate::default()).with_progress(2, |n| seen.push(n));
            extractor.extract(&lines).unwrap();
        }
        assert_eq!(seen, vec![2, 4]);
    }

    #[test]
    fn test_zero_interval_disables_progress() {
        let lines = stream(&["a1", "a2"]);
        let mut calls = 0;
        {
            let mut extractor =
                Extractor::new("repo", DedupGate::default()).with_progress(0, |_| calls += 1);
            extractor.extract(&lines).unwrap();
        }
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_duplicate_block_in_stream_extracted_once() {
        let lines = stream(&["b1", "b1"]);
        let mut extractor = Extractor::new("repo", DedupGate::default());
        let (batch, stats) = extractor.extract(&lines).unwrap();

        assert_eq!(stats, ScanStats { blocks: 2, extracted: 1, skipped: 1 });
        assert_eq!(batch.commits.len(), 1);
        assert_eq!(batch.repo_associations.len(), 2);
        assert!(extractor.gate().is_known("b1"));
    }
}
