//! `--numstat` trailer parsing.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::Revision;

static COUNTED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(\d+)\s+(\S.*)$").expect("counted numstat pattern is valid")
});

static BINARY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s+-\s+(\S.*)$").expect("binary numstat pattern is valid"));

/// A recognized numstat line. Counts are `None` for binary files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatLine<'a> {
    pub added: Option<u64>,
    pub removed: Option<u64>,
    pub path: &'a str,
}

/// Classify one numstat line, returning `None` for blank or unrecognized lines.
pub fn parse_stat_line(line: &str) -> Option<StatLine<'_>> {
    let line = line.trim();

    if let Some(caps) = COUNTED_LINE.captures(line) {
        // Digits that overflow u64 are treated like any other unknown shape.
        let added = caps[1].parse().ok()?;
        let removed = caps[2].parse().ok()?;
        let path = caps.get(3)?.as_str();
        return Some(StatLine { added: Some(added), removed: Some(removed), path });
    }

    if let Some(caps) = BINARY_LINE.captures(line) {
        let path = caps.get(1)?.as_str();
        return Some(StatLine { added: None, removed: None, path });
    }

    None
}

/// Build one [`Revision`] per recognized line, in input order, without deduplication.
pub fn parse_diffstat(commit: &str, trailer: &[String]) -> Vec<Revision> {
    let mut revisions = Vec::with_capacity(trailer.len());

    for line in trailer {
        match parse_stat_line(line) {
            Some(stat) => revisions.push(Revision {
                commit: commit.to_string(),
                path: stat.path.to_string(),
                added: stat.added,
                removed: stat.removed,
            }),
            None if line.trim().is_empty() => {}
            None => debug!("Skipping unrecognized diffstat line for {}: {:?}", commit, line),
        }
    }

    revisions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trailer(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_counted_line() {
        let stat = parse_stat_line("12 3 path/to/file.txt").unwrap();
        assert_eq!(stat, StatLine { added: Some(12), removed: Some(3), path: "path/to/file.txt" });
    }

    #[test]
    fn test_tab_separated_line_with_spaces_in_path() {
        let stat = parse_stat_line("0\t7\tdocs/My Notes.md").unwrap();
        assert_eq!(stat.added, Some(0));
        assert_eq!(stat.removed, Some(7));
        assert_eq!(stat.path, "docs/My Notes.md");
    }

    #[test]
    fn test_binary_line() {
        let stat = parse_stat_line("-\t-\timage.png").unwrap();
        assert_eq!(stat, StatLine { added: None, removed: None, path: "image.png" });
    }

    #[test]
    fn test_rename_path_is_recorded_verbatim() {
        let stat = parse_stat_line("5\t1\tsrc/{old => new}/lib.rs").unwrap();
        assert_eq!(stat.path, "src/{old => new}/lib.rs");
    }

    #[test]
    fn test_unrecognized_lines() {
        assert!(parse_stat_line("").is_none());
        assert!(parse_stat_line("   ").is_none());
        assert!(parse_stat_line("12 file.txt").is_none());
        assert!(parse_stat_line("- 3 file.txt").is_none());
        assert!(parse_stat_line("1 2").is_none());
        assert!(parse_stat_line("99999999999999999999999 1 huge.txt").is_none());
    }

    #[test]
    fn test_parse_diffstat_keeps_order_and_duplicates() {
        let lines = trailer(&["", "1\t0\ta.txt", "garbage", "-\t-\tb.bin", "2\t2\ta.txt"]);
        let revisions = parse_diffstat("abc", &lines);

        assert_eq!(revisions.len(), 3);
        assert_eq!(revisions[0].path, "a.txt");
        assert!(revisions[1].is_binary());
        assert_eq!(revisions[2].path, "a.txt");
        assert_eq!(revisions[2].added, Some(2));
        assert!(revisions.iter().all(|r| r.commit == "abc"));
    }

    #[test]
    fn test_parse_empty_trailer() {
        assert!(parse_diffstat("abc", &[]).is_empty());
    }
}
