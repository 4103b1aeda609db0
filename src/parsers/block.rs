//! Header, message and decoration parsing for a single commit block.

use crate::error::ExtractError;
use crate::models::Commit;
use crate::parsers::dates::parse_log_date;
use crate::parsers::scanner::RawBlock;

/// Number of fixed-position lines at the top of every block
pub const HEADER_LINES: usize = 8;

const ID: usize = 0;
const TREE: usize = 1;
const AUTHOR: usize = 2;
const AUTHOR_DATE: usize = 3;
const COMMITTER: usize = 4;
const COMMITTER_DATE: usize = 5;
const PARENTS: usize = 6;
const DECORATION: usize = 7;

/// The fields recorded for every block, including commits already in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockIdentity<'a> {
    pub id: &'a str,
    pub refs: Vec<String>,
}

/// Full extraction result for a commit seen for the first time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBlock {
    pub commit: Commit,
    /// Parent ids in the order the log lists them.
    pub parents: Vec<String>,
}

fn header<'a>(block: &RawBlock<'a>) -> Result<&'a [String], ExtractError> {
    if block.record.len() < HEADER_LINES {
        return Err(ExtractError::malformed(
            block.start_line,
            format!(
                "expected {} header lines before end sentinel, found {}",
                HEADER_LINES,
                block.record.len()
            ),
        ));
    }
    Ok(&block.record[..HEADER_LINES])
}

/// Object ids are hex digests (SHA-1 or SHA-256).
fn is_object_id(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_hexdigit())
}

fn object_id<'a>(
    block: &RawBlock<'_>,
    field: &str,
    text: &'a str,
) -> Result<&'a str, ExtractError> {
    let text = text.trim();
    if is_object_id(text) {
        Ok(text)
    } else {
        Err(ExtractError::malformed(block.start_line, format!("invalid {} '{}'", field, text)))
    }
}

/// Read the commit id and decoration without touching the rest of the block.
pub fn parse_identity<'a>(block: &RawBlock<'a>) -> Result<BlockIdentity<'a>, ExtractError> {
    let header = header(block)?;
    let id = object_id(block, "commit id", &header[ID])?;
    Ok(BlockIdentity { id, refs: parse_decoration(&header[DECORATION]) })
}

/// Parse the full header and message of a block.
pub fn parse_block(block: &RawBlock<'_>) -> Result<ParsedBlock, ExtractError> {
    let header = header(block)?;
    let id = object_id(block, "commit id", &header[ID])?;
    let tree = object_id(block, "tree id", &header[TREE])?;

    let date = |index: usize, field: &str| {
        parse_log_date(&header[index]).map_err(|e| {
            ExtractError::malformed(
                block.start_line,
                format!("invalid {} '{}': {}", field, header[index].trim(), e),
            )
        })
    };
    let author_date = date(AUTHOR_DATE, "author date")?;
    let committer_date = date(COMMITTER_DATE, "committer date")?;

    let parents = parse_parents(&header[PARENTS]);
    if let Some(bad) = parents.iter().find(|p| !is_object_id(p)) {
        return Err(ExtractError::malformed(
            block.start_line,
            format!("invalid parent id '{}'", bad),
        ));
    }

    let message = join_message(&block.record[HEADER_LINES..]);
    let subject = message.lines().next().unwrap_or_default().trim().to_string();

    let commit = Commit {
        id: id.to_string(),
        tree: tree.to_string(),
        author: header[AUTHOR].trim().to_string(),
        author_date,
        committer: header[COMMITTER].trim().to_string(),
        committer_date,
        subject,
        message,
        parent_count: 0,
        child_count: 0,
    };

    Ok(ParsedBlock { commit, parents })
}

/// Split `%P` output. An empty line is a root commit.
pub fn parse_parents(line: &str) -> Vec<String> {
    line.split_whitespace().map(String::from).collect()
}

/// Split `%d` output such as ` (HEAD -> main, tag: v1.0)` into reference names.
pub fn parse_decoration(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('(').unwrap_or(line);
    let line = line.strip_suffix(')').unwrap_or(line);

    line.split(", ").map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

/// Join message lines with real newlines, dropping the blank lines git leaves at the end.
pub fn join_message(lines: &[String]) -> String {
    let mut end = lines.len();
    while end > 0 && lines[end - 1].trim().is_empty() {
        end -= 1;
    }
    lines[..end].join("\n")
}
