//! Record persistence.
//!
//! The extractor only depends on the [`RecordStore`] trait: one bulk insert per record
//! category plus the enumeration of commits already stored. [`JsonStore`] is the bundled
//! implementation, a directory with one JSON-lines file per category:
//!
//! - `manifest.json`: store version and a log of extraction runs
//! - `commits.jsonl`, `repos.jsonl`, `refs_tags.jsonl`, `dag.jsonl`, `revisions.jsonl`,
//!   `chain.jsonl`: one serialized record per line
//!
//! A batch is staged into temp files for every table and only then renamed into place,
//! `commits.jsonl` last. Until that final rename the batch's commits are not known, so a
//! failed flush is re-extracted in full by the next run.

pub mod aggregate;
pub mod json_store;
pub mod metadata;

use std::collections::HashSet;

use anyhow::Result;

use crate::extract::{RecordBatch, RecordCounts};
use crate::models::{ChainEntry, Commit, DagEdge, RefTag, RepoAssociation, Revision};

pub use aggregate::{RecountSummary, rebuild_chain, recount};
pub use json_store::JsonStore;
pub use metadata::{RunRecord, STORE_VERSION, StoreManifest};

/// Bulk persistence for extracted records.
///
/// Every insert returns the number of rows actually written, which may be lower than
/// `rows.len()` for keyed tables that already hold some of the rows.
pub trait RecordStore {
    /// Ids of every commit already stored.
    fn known_commits(&self) -> Result<HashSet<String>>;

    fn insert_commits(&mut self, rows: &[Commit]) -> Result<usize>;
    fn insert_repo_associations(&mut self, rows: &[RepoAssociation]) -> Result<usize>;
    fn insert_ref_tags(&mut self, rows: &[RefTag]) -> Result<usize>;
    fn insert_dag_edges(&mut self, rows: &[DagEdge]) -> Result<usize>;
    fn insert_revisions(&mut self, rows: &[Revision]) -> Result<usize>;
    fn insert_chain_entries(&mut self, rows: &[ChainEntry]) -> Result<usize>;

    /// Write a whole batch. The default inserts category by category; stores that can stage
    /// their writes override it so a failure leaves every table untouched.
    fn write_batch(&mut self, batch: &RecordBatch) -> Result<RecordCounts> {
        batch.insert_each(self)
    }
}
