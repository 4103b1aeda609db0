//! Relational records mined from repository history.
//!
//! This module defines the rows produced by the extraction engine:
//!
//! - [`Commit`] - One row per distinct commit identifier
//! - [`DagEdge`] - Child to parent relation in the revision graph
//! - [`RepoAssociation`] - Membership of a commit in a named repository
//! - [`RefTag`] - A branch, tag or other decoration pointing at a commit
//! - [`Revision`] - Per-path change statistics from a commit's diffstat
//! - [`ChainEntry`] - A sign-off/ack/review/test/cc trailer with its ordinal
//!
//! All records serialize with serde so the store can persist them as JSON lines.

pub mod chain;
pub mod commit;

pub use chain::{ChainEntry, ChainType};
pub use commit::{Commit, DagEdge, RefTag, RepoAssociation, Revision};
