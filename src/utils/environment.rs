use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable overriding the default store location
pub const STORE_ENV_VAR: &str = "GIT_MINER_STORE";

const STORE_DIR_NAME: &str = "git-history-miner";

/// Resolve the store directory: explicit flag, then `GIT_MINER_STORE`, then the
/// platform data directory (`~/.local/share/git-history-miner` on Linux).
pub fn get_store_dir(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env::var_os(STORE_ENV_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let data_dir = dirs::data_dir().context("Failed to get platform data directory")?;
    Ok(data_dir.join(STORE_DIR_NAME))
}

/// Default repository name: the final component of the canonical repository path
pub fn repo_name_from_path(repo_path: &Path) -> Result<String> {
    let canonical = repo_path
        .canonicalize()
        .with_context(|| format!("Failed to resolve repository path {}", repo_path.display()))?;
    let name = canonical.file_name().with_context(|| {
        format!("Repository path has no final component: {}", canonical.display())
    })?;
    Ok(name.to_string_lossy().into_owned())
}
