//! JSON-lines directory store with atomic table rewrites

use std::collections::HashSet;
use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::RecordStore;
use super::metadata::{RunRecord, STORE_VERSION, StoreManifest};
use crate::extract::{RecordBatch, RecordCategory, RecordCounts};
use crate::models::{ChainEntry, Commit, DagEdge, RefTag, RepoAssociation, Revision};

const MANIFEST_FILENAME: &str = "manifest.json";

/// Only the key of a stored commit, for the known-commit enumeration.
#[derive(Deserialize)]
struct CommitKey {
    id: String,
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!("{}.tmp", file_name))
}

/// Write `contents` to a temp file next to `path`, then rename over it.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let temp = temp_path(path);
    fs::write(&temp, contents)
        .with_context(|| format!("Failed to write temp file {}", temp.display()))?;
    fs::rename(&temp, path)
        .with_context(|| format!("Failed to rename temp file to {}", path.display()))?;
    Ok(())
}

/// A table rewrite sitting in its temp file until the whole batch is staged.
struct StagedTable {
    temp: PathBuf,
    path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
    manifest: StoreManifest,
}

impl JsonStore {
    /// Open the store at `root`, creating the directory and manifest when missing.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created, or the manifest is unreadable or was
    /// written by a different store version.
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create store directory {}", root.display()))?;

        let manifest_path = root.join(MANIFEST_FILENAME);
        let manifest = if manifest_path.exists() {
            let json = fs::read_to_string(&manifest_path).context("Failed to read store manifest")?;
            let manifest: StoreManifest =
                serde_json::from_str(&json).context("Failed to parse store manifest")?;
            if manifest.version != STORE_VERSION {
                bail!(
                    "Store version mismatch at {} (expected {}, found {})",
                    root.display(),
                    STORE_VERSION,
                    manifest.version
                );
            }
            manifest
        } else {
            let manifest = StoreManifest::new();
            let json =
                serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
            write_atomic(&manifest_path, json.as_bytes())?;
            manifest
        };

        Ok(Self { root: root.to_path_buf(), manifest })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &StoreManifest {
        &self.manifest
    }

    /// Append `run` to the manifest and save it.
    pub fn record_run(&mut self, run: RunRecord) -> Result<()> {
        self.manifest.runs.push(run);
        let json =
            serde_json::to_string_pretty(&self.manifest).context("Failed to serialize manifest")?;
        write_atomic(&self.root.join(MANIFEST_FILENAME), json.as_bytes())
    }

    pub fn table_path(&self, category: RecordCategory) -> PathBuf {
        self.root.join(format!("{}.jsonl", category.table_name()))
    }

    /// Load every row of a table. A missing table is empty.
    pub fn load<T: DeserializeOwned>(&self, category: RecordCategory) -> Result<Vec<T>> {
        let path = self.table_path(category);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {} table", category))?;
        let mut rows = Vec::new();
        for (line_num, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row = serde_json::from_str(line).with_context(|| {
                format!("Failed to parse {} row at line {}", category, line_num + 1)
            })?;
            rows.push(row);
        }
        Ok(rows)
    }

    pub fn commits(&self) -> Result<Vec<Commit>> {
        self.load(RecordCategory::Commits)
    }

    pub fn dag_edges(&self) -> Result<Vec<DagEdge>> {
        self.load(RecordCategory::DagEdges)
    }

    pub fn repo_associations(&self) -> Result<Vec<RepoAssociation>> {
        self.load(RecordCategory::RepoAssociations)
    }

    pub fn ref_tags(&self) -> Result<Vec<RefTag>> {
        self.load(RecordCategory::RefTags)
    }

    pub fn revisions(&self) -> Result<Vec<Revision>> {
        self.load(RecordCategory::Revisions)
    }

    pub fn chain_entries(&self) -> Result<Vec<ChainEntry>> {
        self.load(RecordCategory::ChainEntries)
    }

    /// Overwrite a whole table.
    pub fn replace<T: Serialize>(&self, category: RecordCategory, rows: &[T]) -> Result<()> {
        let contents = serialize_rows(category, rows.iter())?;
        write_atomic(&self.table_path(category), &contents)
    }

    /// Row counts for every table.
    pub fn counts(&self) -> Result<RecordCounts> {
        Ok(RecordCounts {
            commits: self.count_rows(RecordCategory::Commits)?,
            repo_associations: self.count_rows(RecordCategory::RepoAssociations)?,
            ref_tags: self.count_rows(RecordCategory::RefTags)?,
            dag_edges: self.count_rows(RecordCategory::DagEdges)?,
            revisions: self.count_rows(RecordCategory::Revisions)?,
            chain_entries: self.count_rows(RecordCategory::ChainEntries)?,
        })
    }

    fn count_rows(&self, category: RecordCategory) -> Result<usize> {
        let path = self.table_path(category);
        if !path.exists() {
            return Ok(0);
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {} table", category))?;
        Ok(text.lines().filter(|l| !l.trim().is_empty()).count())
    }

    /// Current table contents with `rows` appended, or `None` when there is nothing to add.
    fn appended<'r, T: Serialize + 'r>(
        &self,
        category: RecordCategory,
        rows: impl IntoIterator<Item = &'r T>,
    ) -> Result<Option<(Vec<u8>, usize)>> {
        let new_rows: Vec<&T> = rows.into_iter().collect();
        if new_rows.is_empty() {
            return Ok(None);
        }

        let path = self.table_path(category);
        let mut contents = if path.exists() {
            fs::read(&path).with_context(|| format!("Failed to read {} table", category))?
        } else {
            Vec::new()
        };
        if contents.last().is_some_and(|b| *b != b'\n') {
            contents.push(b'\n');
        }
        contents.extend(serialize_rows(category, new_rows.iter().copied())?);

        Ok(Some((contents, new_rows.len())))
    }

    fn append<'r, T: Serialize + 'r>(
        &self,
        category: RecordCategory,
        rows: impl IntoIterator<Item = &'r T>,
    ) -> Result<usize> {
        match self.appended(category, rows)? {
            Some((contents, count)) => {
                write_atomic(&self.table_path(category), &contents)?;
                Ok(count)
            }
            None => Ok(0),
        }
    }

    /// Rows whose key is neither stored nor repeated earlier in `rows`.
    fn unseen<'r, T, K>(
        &self,
        category: RecordCategory,
        rows: &'r [T],
        key: impl Fn(&T) -> K,
    ) -> Result<Vec<&'r T>>
    where
        T: DeserializeOwned,
        K: Eq + Hash,
    {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let mut seen: HashSet<K> = self.load::<T>(category)?.iter().map(&key).collect();
        Ok(rows.iter().filter(|&row| seen.insert(key(row))).collect())
    }

    fn unseen_commits<'r>(&self, rows: &'r [Commit]) -> Result<Vec<&'r Commit>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let mut seen = self.known_commits()?;
        Ok(rows.iter().filter(|c| seen.insert(c.id.clone())).collect())
    }

    /// Write the appended table to its temp file without touching the table itself.
    fn stage<'r, T: Serialize + 'r>(
        &self,
        category: RecordCategory,
        rows: impl IntoIterator<Item = &'r T>,
        staged: &mut Vec<(RecordCategory, StagedTable)>,
    ) -> Result<usize> {
        let Some((contents, count)) = self.appended(category, rows)? else {
            return Ok(0);
        };
        let path = self.table_path(category);
        let temp = temp_path(&path);
        fs::write(&temp, contents)
            .with_context(|| format!("Failed to write temp file {}", temp.display()))?;
        staged.push((category, StagedTable { temp, path }));
        Ok(count)
    }

    fn stage_batch(
        &self,
        batch: &RecordBatch,
        staged: &mut Vec<(RecordCategory, StagedTable)>,
    ) -> Result<RecordCounts> {
        let mut written = RecordCounts::default();

        for category in RecordCategory::FLUSH_ORDER {
            let count = match category {
                RecordCategory::Commits => {
                    let rows = self.unseen_commits(&batch.commits)?;
                    self.stage(category, rows, staged)
                }
                RecordCategory::RepoAssociations => {
                    let rows = self.unseen(category, &batch.repo_associations, |r| {
                        (r.repo.clone(), r.commit.clone())
                    })?;
                    self.stage(category, rows, staged)
                }
                RecordCategory::RefTags => {
                    let rows = self.unseen(category, &batch.ref_tags, |r| {
                        (r.commit.clone(), r.name.clone())
                    })?;
                    self.stage(category, rows, staged)
                }
                RecordCategory::DagEdges => self.stage(category, &batch.dag_edges, staged),
                RecordCategory::Revisions => self.stage(category, &batch.revisions, staged),
                RecordCategory::ChainEntries => {
                    self.stage(category, &batch.chain_entries, staged)
                }
            }
            .with_context(|| format!("Failed to flush {} rows", category))?;

            written.set(category, count);
        }

        Ok(written)
    }
}

fn discard(staged: &[(RecordCategory, StagedTable)]) {
    for (_, table) in staged {
        if let Err(e) = fs::remove_file(&table.temp) {
            warn!("Failed to remove temp file {}: {}", table.temp.display(), e);
        }
    }
}

fn serialize_rows<'r, T: Serialize + 'r>(
    category: RecordCategory,
    rows: impl Iterator<Item = &'r T>,
) -> Result<Vec<u8>> {
    let mut contents = Vec::new();
    for row in rows {
        serde_json::to_writer(&mut contents, row)
            .with_context(|| format!("Failed to serialize {} row", category))?;
        contents.push(b'\n');
    }
    Ok(contents)
}

impl RecordStore for JsonStore {
    fn known_commits(&self) -> Result<HashSet<String>> {
        let keys: Vec<CommitKey> = self.load(RecordCategory::Commits)?;
        Ok(keys.into_iter().map(|k| k.id).collect())
    }

    fn insert_commits(&mut self, rows: &[Commit]) -> Result<usize> {
        let rows = self.unseen_commits(rows)?;
        self.append(RecordCategory::Commits, rows)
    }

    fn insert_repo_associations(&mut self, rows: &[RepoAssociation]) -> Result<usize> {
        let rows = self.unseen(RecordCategory::RepoAssociations, rows, |r| {
            (r.repo.clone(), r.commit.clone())
        })?;
        self.append(RecordCategory::RepoAssociations, rows)
    }

    fn insert_ref_tags(&mut self, rows: &[RefTag]) -> Result<usize> {
        let rows =
            self.unseen(RecordCategory::RefTags, rows, |r| (r.commit.clone(), r.name.clone()))?;
        self.append(RecordCategory::RefTags, rows)
    }

    fn insert_dag_edges(&mut self, rows: &[DagEdge]) -> Result<usize> {
        self.append(RecordCategory::DagEdges, rows)
    }

    fn insert_revisions(&mut self, rows: &[Revision]) -> Result<usize> {
        self.append(RecordCategory::Revisions, rows)
    }

    fn insert_chain_entries(&mut self, rows: &[ChainEntry]) -> Result<usize> {
        self.append(RecordCategory::ChainEntries, rows)
    }

    /// Stage every table, then rename them into place with `commits.jsonl` last.
    ///
    /// Nothing is renamed unless every table stages. Until the commits table is replaced the
    /// batch's commits stay unknown, so a later run extracts them again in full.
    fn write_batch(&mut self, batch: &RecordBatch) -> Result<RecordCounts> {
        let mut staged = Vec::new();
        let written = match self.stage_batch(batch, &mut staged) {
            Ok(written) => written,
            Err(e) => {
                discard(&staged);
                return Err(e);
            }
        };

        staged.sort_by_key(|(category, _)| *category == RecordCategory::Commits);
        for (index, (category, table)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(&table.temp, &table.path) {
                discard(&staged[index..]);
                return Err(e).with_context(|| format!("Failed to flush {} rows", category));
            }
        }

        Ok(written)
    }
}
