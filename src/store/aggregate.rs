//! Post-processing passes over a populated store.
//!
//! Both passes read whole tables and rewrite them, so they can be rerun at any time and
//! always reflect the current contents of the store.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use rayon::prelude::*;
use tracing::info;

use super::json_store::JsonStore;
use crate::extract::RecordCategory;
use crate::models::{ChainEntry, Commit};
use crate::parsers::extract_chain;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecountSummary {
    pub commits: usize,
    pub edges: usize,
    /// Edges whose parent commit has not been mined (yet).
    pub dangling_parents: usize,
}

/// Fill `parent_count` and `child_count` on every stored commit from the DAG table.
pub fn recount(store: &JsonStore) -> Result<RecountSummary> {
    let mut commits: Vec<Commit> = store.commits()?;
    let edges = store.dag_edges()?;

    let mut parents: HashMap<&str, u32> = HashMap::new();
    let mut children: HashMap<&str, u32> = HashMap::new();
    for edge in &edges {
        *parents.entry(edge.child.as_str()).or_default() += 1;
        *children.entry(edge.parent.as_str()).or_default() += 1;
    }

    let ids: HashSet<&str> = commits.iter().map(|c| c.id.as_str()).collect();
    let dangling_parents = edges.iter().filter(|e| !ids.contains(e.parent.as_str())).count();

    let counts: Vec<(u32, u32)> = commits
        .iter()
        .map(|c| {
            let id = c.id.as_str();
            (
                parents.get(id).copied().unwrap_or(0),
                children.get(id).copied().unwrap_or(0),
            )
        })
        .collect();

    for (commit, (parent_count, child_count)) in commits.iter_mut().zip(counts) {
        commit.parent_count = parent_count;
        commit.child_count = child_count;
    }

    store.replace(RecordCategory::Commits, &commits)?;
    info!(
        "Recounted {} commits over {} edges ({} dangling parents)",
        commits.len(),
        edges.len(),
        dangling_parents
    );

    Ok(RecountSummary { commits: commits.len(), edges: edges.len(), dangling_parents })
}

/// Re-derive every chain entry from stored commit messages, replacing the chain table.
///
/// Commits are independent, so extraction runs in parallel; output keeps commit order.
pub fn rebuild_chain(store: &JsonStore) -> Result<usize> {
    let commits = store.commits()?;

    let entries: Vec<ChainEntry> =
        commits.par_iter().flat_map_iter(|c| extract_chain(&c.id, &c.message)).collect();

    store.replace(RecordCategory::ChainEntries, &entries)?;
    info!("Rebuilt {} chain entries from {} commits", entries.len(), commits.len());

    Ok(entries.len())
}
