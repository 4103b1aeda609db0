//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use git_history_miner::JsonStore;
use git_history_miner::parsers::{END_SENTINEL, START_SENTINEL};
use tempfile::TempDir;

/// 40-character hex id derived from `n`
pub fn hex_id(n: u32) -> String {
    format!("{:040x}", n)
}

/// Builder for one commit block as `git log` prints it with the miner's format
#[derive(Clone)]
pub struct CommitBuilder {
    id: String,
    tree: String,
    author: String,
    author_date: String,
    committer: String,
    committer_date: String,
    parents: Vec<String>,
    decoration: String,
    message: Vec<String>,
    stats: Vec<String>,
}

impl CommitBuilder {
    /// Create a root commit with default header values
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            tree: "4b825dc642cb6eb9a060e54bf8d69288fbee4904".to_string(),
            author: "Alice <alice@example.com>".to_string(),
            author_date: "Tue, 3 Oct 2023 14:05:09 +0200".to_string(),
            committer: "Bob <bob@example.com>".to_string(),
            committer_date: "Wed, 4 Oct 2023 09:00:00 +0000".to_string(),
            parents: Vec::new(),
            decoration: String::new(),
            message: vec!["Test commit".to_string()],
            stats: Vec::new(),
        }
    }

    pub fn parent(mut self, parent: &str) -> Self {
        self.parents.push(parent.to_string());
        self
    }

    /// Raw `%d` text, e.g. ` (HEAD -> main, tag: v1.0)`
    pub fn decoration(mut self, decoration: &str) -> Self {
        self.decoration = decoration.to_string();
        self
    }

    pub fn author_date(mut self, date: &str) -> Self {
        self.author_date = date.to_string();
        self
    }

    /// Full message, subject first
    pub fn message(mut self, message: &str) -> Self {
        self.message = message.lines().map(String::from).collect();
        self
    }

    pub fn numstat(mut self, added: u64, removed: u64, path: &str) -> Self {
        self.stats.push(format!("{}\t{}\t{}", added, removed, path));
        self
    }

    pub fn binary(mut self, path: &str) -> Self {
        self.stats.push(format!("-\t-\t{}", path));
        self
    }

    /// Any raw line for the trailer region
    pub fn stat_line(mut self, line: &str) -> Self {
        self.stats.push(line.to_string());
        self
    }

    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![
            START_SENTINEL.to_string(),
            self.id.clone(),
            self.tree.clone(),
            self.author.clone(),
            self.author_date.clone(),
            self.committer.clone(),
            self.committer_date.clone(),
            self.parents.join(" "),
            self.decoration.clone(),
        ];
        lines.extend(self.message.iter().cloned());
        // %b always ends with a newline
        lines.push(String::new());
        lines.push(END_SENTINEL.to_string());
        if !self.stats.is_empty() {
            lines.push(String::new());
            lines.extend(self.stats.iter().cloned());
        }
        lines
    }
}

/// Builder for a complete log stream
#[derive(Default)]
pub struct LogStreamBuilder {
    preamble: Vec<String>,
    commits: Vec<CommitBuilder>,
}

impl LogStreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines printed before the first block
    pub fn preamble(mut self, line: &str) -> Self {
        self.preamble.push(line.to_string());
        self
    }

    pub fn with_commit(mut self, commit: CommitBuilder) -> Self {
        self.commits.push(commit);
        self
    }

    /// `n` unrelated root commits with ids `hex_id(1..=n)`
    pub fn with_roots(mut self, n: u32) -> Self {
        for i in 1..=n {
            self.commits.push(CommitBuilder::new(&hex_id(i)).numstat(1, 0, &format!("f{}.txt", i)));
        }
        self
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.preamble.clone();
        for commit in &self.commits {
            lines.extend(commit.to_lines());
        }
        lines
    }

    pub fn text(&self) -> String {
        let mut text = self.lines().join("\n");
        text.push('\n');
        text
    }

    /// Write the stream to `dir/name` and return the path
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, self.text()).expect("Failed to write log file");
        path
    }
}

/// Fresh store in a temp directory. Keep the `TempDir` alive for the test's duration.
pub fn temp_store() -> (TempDir, JsonStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = JsonStore::open(&dir.path().join("store")).expect("Failed to open store");
    (dir, store)
}
