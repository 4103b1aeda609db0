//! `git log` command execution.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use super::{LineSource, decode_output, split_lines};
use crate::error::ExtractError;

/// Pretty format emitting one sentinel-delimited block per commit.
///
/// Placeholders, one per line:
/// - %H / %T: commit and tree hash
/// - %an <%ae>, %aD: author identity and RFC 2822 date
/// - %cn <%ce>, %cD: committer identity and RFC 2822 date
/// - %P: parent hashes
/// - %d: ref decoration
/// - %s, %b: subject and body
pub const LOG_FORMAT: &str = concat!(
    "__START_GIT__COMMIT_LOG_MSG__%n",
    "%H%n%T%n%an <%ae>%n%aD%n%cn <%ce>%n%cD%n%P%n%d%n",
    "%s%n%b%n",
    "__END_GIT_COMMIT_LOG_MSG__"
);

/// Runs `git log` over a repository and returns its output lines.
#[derive(Debug, Clone)]
pub struct GitLogCommand {
    repo_path: PathBuf,
    revisions: Vec<String>,
}

impl GitLogCommand {
    /// Create a command for the repository at `repo_path`, walking `--all` refs by default.
    pub fn new(repo_path: &Path) -> Result<Self, ExtractError> {
        let output = Command::new("git")
            .arg("--version")
            .output()
            .map_err(|_| ExtractError::GitNotAvailable)?;
        if !output.status.success() {
            return Err(ExtractError::GitNotAvailable);
        }

        let output = Command::new("git")
            .current_dir(repo_path)
            .args(["rev-parse", "--git-dir"])
            .output()?;
        if !output.status.success() {
            return Err(ExtractError::NotARepository(repo_path.to_path_buf()));
        }

        Ok(Self { repo_path: repo_path.to_path_buf(), revisions: vec!["--all".to_string()] })
    }

    /// Replace the revision arguments (`--all`, branch names, ranges).
    pub fn with_revisions(mut self, revisions: Vec<String>) -> Self {
        if !revisions.is_empty() {
            self.revisions = revisions;
        }
        self
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Full argument list passed to `git`.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "log".to_string(),
            "--full-history".to_string(),
            "--numstat".to_string(),
            "-M".to_string(),
            "-C".to_string(),
            format!("--pretty=format:{}", LOG_FORMAT),
        ];
        args.extend(self.revisions.iter().cloned());
        args.push("--".to_string());
        args
    }
}

impl LineSource for GitLogCommand {
    fn read_lines(&mut self) -> Result<Vec<String>, ExtractError> {
        info!("Running git log in {}", self.repo_path.display());
        let output = Command::new("git").current_dir(&self.repo_path).args(self.args()).output()?;

        if !output.status.success() {
            return Err(ExtractError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let text = decode_output(output.stdout, "git log output");
        Ok(split_lines(&text))
    }
}
