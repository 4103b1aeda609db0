//! In-memory accumulation of extracted records and their bulk flush.

use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{ChainEntry, Commit, DagEdge, RefTag, RepoAssociation, Revision};
use crate::store::RecordStore;

/// Record kinds, in the order they are flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordCategory {
    Commits,
    RepoAssociations,
    RefTags,
    DagEdges,
    Revisions,
    ChainEntries,
}

impl RecordCategory {
    /// Commits first so stores enforcing foreign keys accept the rows that reference them.
    pub const FLUSH_ORDER: [RecordCategory; 6] = [
        RecordCategory::Commits,
        RecordCategory::RepoAssociations,
        RecordCategory::RefTags,
        RecordCategory::DagEdges,
        RecordCategory::Revisions,
        RecordCategory::ChainEntries,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            RecordCategory::Commits => "commits",
            RecordCategory::RepoAssociations => "repos",
            RecordCategory::RefTags => "refs_tags",
            RecordCategory::DagEdges => "dag",
            RecordCategory::Revisions => "revisions",
            RecordCategory::ChainEntries => "chain",
        }
    }
}

impl fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Row counts per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCounts {
    pub commits: usize,
    pub repo_associations: usize,
    pub ref_tags: usize,
    pub dag_edges: usize,
    pub revisions: usize,
    pub chain_entries: usize,
}

impl RecordCounts {
    pub fn get(&self, category: RecordCategory) -> usize {
        match category {
            RecordCategory::Commits => self.commits,
            RecordCategory::RepoAssociations => self.repo_associations,
            RecordCategory::RefTags => self.ref_tags,
            RecordCategory::DagEdges => self.dag_edges,
            RecordCategory::Revisions => self.revisions,
            RecordCategory::ChainEntries => self.chain_entries,
        }
    }

    pub(crate) fn set(&mut self, category: RecordCategory, value: usize) {
        let slot = match category {
            RecordCategory::Commits => &mut self.commits,
            RecordCategory::RepoAssociations => &mut self.repo_associations,
            RecordCategory::RefTags => &mut self.ref_tags,
            RecordCategory::DagEdges => &mut self.dag_edges,
            RecordCategory::Revisions => &mut self.revisions,
            RecordCategory::ChainEntries => &mut self.chain_entries,
        };
        *slot = value;
    }
}

/// Append-only buffers for one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBatch {
    pub commits: Vec<Commit>,
    pub repo_associations: Vec<RepoAssociation>,
    pub ref_tags: Vec<RefTag>,
    pub dag_edges: Vec<DagEdge>,
    pub revisions: Vec<Revision>,
    pub chain_entries: Vec<ChainEntry>,
}

impl RecordBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> RecordCounts {
        RecordCounts {
            commits: self.commits.len(),
            repo_associations: self.repo_associations.len(),
            ref_tags: self.ref_tags.len(),
            dag_edges: self.dag_edges.len(),
            revisions: self.revisions.len(),
            chain_entries: self.chain_entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts() == RecordCounts::default()
    }

    /// Hand the whole batch to `store`, which decides whether the write is all-or-nothing.
    ///
    /// Returns the rows the store reports as written. No retry is attempted.
    pub fn flush<S: RecordStore + ?Sized>(&self, store: &mut S) -> Result<RecordCounts> {
        store.write_batch(self)
    }

    /// Write every category to `store` with one bulk insert each, in
    /// [`RecordCategory::FLUSH_ORDER`]. The first failing category aborts the rest;
    /// categories inserted before it stay written.
    pub fn insert_each<S: RecordStore + ?Sized>(&self, store: &mut S) -> Result<RecordCounts> {
        let mut written = RecordCounts::default();

        for category in RecordCategory::FLUSH_ORDER {
            let count = match category {
                RecordCategory::Commits => store.insert_commits(&self.commits),
                RecordCategory::RepoAssociations => {
                    store.insert_repo_associations(&self.repo_associations)
                }
                RecordCategory::RefTags => store.insert_ref_tags(&self.ref_tags),
                RecordCategory::DagEdges => store.insert_dag_edges(&self.dag_edges),
                RecordCategory::Revisions => store.insert_revisions(&self.revisions),
                RecordCategory::ChainEntries => store.insert_chain_entries(&self.chain_entries),
            }
            .with_context(|| format!("Failed to flush {} rows", category))?;

            written.set(category, count);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use anyhow::bail;

    use super::*;

    /// Records the order categories arrive in and optionally fails one of them.
    #[derive(Default)]
    struct RecordingStore {
        calls: Vec<RecordCategory>,
        fail_on: Option<RecordCategory>,
    }

    impl RecordingStore {
        fn record(&mut self, category: RecordCategory, len: usize) -> Result<usize> {
            self.calls.push(category);
            if self.fail_on == Some(category) {
                bail!("disk full");
            }
            Ok(len)
        }
    }

    impl RecordStore for RecordingStore {
        fn known_commits(&self) -> Result<HashSet<String>> {
            Ok(HashSet::new())
        }
        fn insert_commits(&mut self, rows: &[Commit]) -> Result<usize> {
            self.record(RecordCategory::Commits, rows.len())
        }
        fn insert_repo_associations(&mut self, rows: &[RepoAssociation]) -> Result<usize> {
            self.record(RecordCategory::RepoAssociations, rows.len())
        }
        fn insert_ref_tags(&mut self, rows: &[RefTag]) -> Result<usize> {
            self.record(RecordCategory::RefTags, rows.len())
        }
        fn insert_dag_edges(&mut self, rows: &[DagEdge]) -> Result<usize> {
            self.record(RecordCategory::DagEdges, rows.len())
        }
        fn insert_revisions(&mut self, rows: &[Revision]) -> Result<usize> {
            self.record(RecordCategory::Revisions, rows.len())
        }
        fn insert_chain_entries(&mut self, rows: &[ChainEntry]) -> Result<usize> {
            self.record(RecordCategory::ChainEntries, rows.len())
        }
    }

    fn sample_batch() -> RecordBatch {
        let mut batch = RecordBatch::new();
        batch.repo_associations.push(RepoAssociation { repo: "r".into(), commit: "a".into() });
        batch.dag_edges.push(DagEdge { child: "a".into(), parent: "b".into() });
        batch.dag_edges.push(DagEdge { child: "a".into(), parent: "c".into() });
        batch
    }

    #[test]
    fn test_flush_in_dependency_order() {
        let mut store = RecordingStore::default();
        let written = sample_batch().flush(&mut store).unwrap();

        assert_eq!(store.calls, RecordCategory::FLUSH_ORDER.to_vec());
        assert_eq!(written.repo_associations, 1);
        assert_eq!(written.dag_edges, 2);
        assert_eq!(written.commits, 0);
    }

    #[test]
    fn test_flush_stops_at_first_failure() {
        let mut store =
            RecordingStore { fail_on: Some(RecordCategory::RefTags), ..Default::default() };
        let err = sample_batch().flush(&mut store).unwrap_err();

        assert!(err.to_string().contains("Failed to flush refs_tags rows"));
        assert_eq!(store.calls.last(), Some(&RecordCategory::RefTags));
        assert!(!store.calls.contains(&RecordCategory::DagEdges));
    }

    #[test]
    fn test_counts_and_is_empty() {
        assert!(RecordBatch::new().is_empty());
        let batch = sample_batch();
        assert!(!batch.is_empty());
        assert_eq!(batch.counts().get(RecordCategory::DagEdges), 2);
    }
}
