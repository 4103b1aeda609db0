//! Line sources feeding the extractor.
//!
//! A source yields the complete, newline-stripped output of one `git log` run, either by
//! running `git` ([`GitLogCommand`]) or by reading a saved copy ([`LogFile`]). The whole
//! output is read before extraction starts so that a failing `git` process aborts the run
//! before anything reaches the store.

pub mod file;
pub mod git;

use tracing::warn;

use crate::error::ExtractError;

pub use file::LogFile;
pub use git::{GitLogCommand, LOG_FORMAT};

/// Produces the ordered lines of a log.
pub trait LineSource {
    fn read_lines(&mut self) -> Result<Vec<String>, ExtractError>;
}

impl LineSource for Vec<String> {
    fn read_lines(&mut self) -> Result<Vec<String>, ExtractError> {
        Ok(self.clone())
    }
}

/// Decode raw log bytes. Old repositories carry non-UTF-8 messages, so invalid sequences
/// are replaced rather than failing the run.
pub(crate) fn decode_output(bytes: Vec<u8>, origin: &str) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("{} contains invalid UTF-8, replacing undecodable bytes", origin);
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

/// Split on `\n` or `\r\n`, without the terminators.
pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(String::from).collect()
}
