use std::fs;
use std::path::{Path, PathBuf};

use super::{LineSource, decode_output, split_lines};
use crate::error::ExtractError;

/// A saved `git log` output, produced with the same format as [`super::LOG_FORMAT`].
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for LogFile {
    fn read_lines(&mut self) -> Result<Vec<String>, ExtractError> {
        let bytes = fs::read(&self.path)
            .map_err(|source| ExtractError::ReadLog { path: self.path.clone(), source })?;
        let text = decode_output(bytes, &self.path.display().to_string());
        Ok(split_lines(&text))
    }
}
