use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub tree: String,
    /// `Name <email>` as reported by the log.
    pub author: String,
    pub author_date: DateTime<FixedOffset>,
    pub committer: String,
    pub committer_date: DateTime<FixedOffset>,
    #[serde(default)]
    pub subject: String,
    /// Subject and body joined with `\n`.
    #[serde(default)]
    pub message: String,
    /// Filled in by the recount pass, zero until then.
    #[serde(default)]
    pub parent_count: u32,
    #[serde(default)]
    pub child_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    pub child: String,
    pub parent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoAssociation {
    pub repo: String,
    pub commit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefTag {
    pub commit: String,
    pub name: String,
}

/// One diffstat line. Binary changes carry no counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub commit: String,
    pub path: String,
    pub added: Option<u64>,
    pub removed: Option<u64>,
}

impl Revision {
    pub fn is_binary(&self) -> bool {
        self.added.is_none() && self.removed.is_none()
    }
}
