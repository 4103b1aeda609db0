//! Splits a log line stream into per-commit blocks.

use tracing::debug;

use crate::error::ExtractError;

pub const START_SENTINEL: &str = "__START_GIT__COMMIT_LOG_MSG__";
pub const END_SENTINEL: &str = "__END_GIT_COMMIT_LOG_MSG__";

/// One commit's region of the stream, borrowed from the line buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlock<'a> {
    /// 1-based line number of the start sentinel, used in diagnostics.
    pub start_line: usize,
    /// Header and message lines between the two sentinels.
    pub record: &'a [String],
    /// Diffstat lines after the end sentinel, up to the next start sentinel or end of input.
    pub trailer: &'a [String],
}

fn is_start(line: &str) -> bool {
    line.trim() == START_SENTINEL
}

fn is_end(line: &str) -> bool {
    line.trim() == END_SENTINEL
}

/// Locate the block at or after `cursor`.
///
/// Returns the block and the cursor for the following scan, or `None` once no start
/// sentinel remains. The returned cursor always points at the next start sentinel or
/// past the end of `lines`.
pub fn next_block(
    lines: &[String],
    cursor: usize,
) -> Result<Option<(RawBlock<'_>, usize)>, ExtractError> {
    let Some(rest) = lines.get(cursor..) else {
        return Ok(None);
    };
    let Some(start) = rest.iter().position(|l| is_start(l)).map(|i| cursor + i) else {
        return Ok(None);
    };

    let skipped = lines[cursor..start].iter().filter(|l| !l.trim().is_empty()).count();
    if skipped > 0 {
        debug!("Skipped {} lines before start sentinel at line {}", skipped, start + 1);
    }

    let start_line = start + 1;
    let record_from = start + 1;
    let mut end = None;
    for (offset, line) in lines[record_from..].iter().enumerate() {
        if is_end(line) {
            end = Some(record_from + offset);
            break;
        }
        if is_start(line) {
            return Err(ExtractError::malformed(
                start_line,
                format!("start sentinel at line {} before end sentinel", record_from + offset + 1),
            ));
        }
    }
    let end = end.ok_or_else(|| ExtractError::malformed(start_line, "missing end sentinel"))?;

    let trailer_from = end + 1;
    let next = lines[trailer_from..]
        .iter()
        .position(|l| is_start(l))
        .map_or(lines.len(), |i| trailer_from + i);
    if let Some(offset) = lines[trailer_from..next].iter().position(|l| is_end(l)) {
        return Err(ExtractError::malformed(
            start_line,
            format!(
                "end sentinel at line {} after end sentinel at line {}",
                trailer_from + offset + 1,
                end + 1
            ),
        ));
    }

    let block = RawBlock {
        start_line,
        record: &lines[record_from..end],
        trailer: &lines[trailer_from..next],
    };
    Ok(Some((block, next)))
}

/// Iterator over the blocks of a line buffer. Stops after the first error.
pub struct Blocks<'a> {
    lines: &'a [String],
    cursor: Option<usize>,
}

impl<'a> Blocks<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        Self { lines, cursor: Some(0) }
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Result<RawBlock<'a>, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.take()?;
        match next_block(self.lines, cursor) {
            Ok(Some((block, next))) => {
                self.cursor = Some(next);
                Some(Ok(block))
            }
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
