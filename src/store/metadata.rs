//! Store manifest: schema version and run history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::RecordCounts;

/// Store schema version, checked on open
pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreManifest {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub runs: Vec<RunRecord>,
}

/// One completed extraction run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub repo: String,
    pub finished_at: DateTime<Utc>,
    pub blocks: usize,
    pub written: RecordCounts,
}

impl StoreManifest {
    pub fn new() -> Self {
        Self { version: STORE_VERSION, created_at: Utc::now(), runs: Vec::new() }
    }

    /// Most recent run for `repo`, if any
    pub fn last_run(&self, repo: &str) -> Option<&RunRecord> {
        self.runs.iter().rev().find(|r| r.repo == repo)
    }
}

impl Default for StoreManifest {
    fn default() -> Self {
        Self::new()
    }
}
