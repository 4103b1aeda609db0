//! Sign-off chain extraction from commit messages.
//!
//! A trailer is any message line of the form `Label: value`, with whitespace after the colon,
//! where the label is one of `Signed-off-by`, `Acked-by`, `Reviewed-by`, `Tested-by` or `Cc`
//! (any case). Each entry gets an ordinal counting earlier entries of the same type in the
//! same message, so the order of several sign-offs on one commit is preserved.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ChainEntry, ChainType};

static TRAILER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(signed-off-by|acked-by|reviewed-by|tested-by|cc):\s+(\S.*?)\s*$")
        .expect("trailer pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer<'a> {
    pub chain_type: ChainType,
    pub name_addr: &'a str,
}

/// Match a single message line against the trailer pattern.
pub fn match_trailer(line: &str) -> Option<Trailer<'_>> {
    let caps = TRAILER_LINE.captures(line)?;
    let chain_type = ChainType::from_label(caps.get(1)?.as_str())?;
    let name_addr = caps.get(2)?.as_str();
    Some(Trailer { chain_type, name_addr })
}

/// Extract every trailer in `message`, numbering entries per type from zero.
pub fn extract_chain(commit: &str, message: &str) -> Vec<ChainEntry> {
    let mut counters = [0u32; ChainType::ALL.len()];

    message
        .lines()
        .filter_map(match_trailer)
        .map(|trailer| {
            let counter = &mut counters[trailer.chain_type.index()];
            let ordinal = *counter;
            *counter += 1;
            ChainEntry {
                commit: commit.to_string(),
                name_addr: trailer.name_addr.to_string(),
                chain_type: trailer.chain_type,
                ordinal,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sign_offs_are_ordered() {
        let message = "Fix parser\n\nSigned-off-by: Alice <a@x.com>\nSigned-off-by: Bob <b@x.com>";
        let chain = extract_chain("c1", message);

        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].chain_type, ChainType::Signed);
        assert_eq!(chain[0].ordinal, 0);
        assert_eq!(chain[0].name_addr, "Alice <a@x.com>");
        assert_eq!(chain[1].ordinal, 1);
        assert_eq!(chain[1].name_addr, "Bob <b@x.com>");
    }

    #[test]
    fn test_ordinals_are_per_type() {
        let message = "\
Subject

Signed-off-by: A <a@x.com>
Reviewed-by: R <r@x.com>
Cc: C1 <c1@x.com>
Signed-off-by: B <b@x.com>
cc: C2 <c2@x.com>
Tested-by: T <t@x.com>
ACKED-BY: K <k@x.com>";
        let chain = extract_chain("c1", message);
        let summary: Vec<_> = chain.iter().map(|e| (e.chain_type, e.ordinal)).collect();

        assert_eq!(
            summary,
            vec![
                (ChainType::Signed, 0),
                (ChainType::Reviewed, 0),
                (ChainType::Cc, 0),
                (ChainType::Signed, 1),
                (ChainType::Cc, 1),
                (ChainType::Tested, 0),
                (ChainType::Acked, 0),
            ]
        );
    }

    #[test]
    fn test_value_not_label_is_stored() {
        let trailer = match_trailer("   Acked-by:   Carol <carol@x.com>   ").unwrap();
        assert_eq!(trailer.chain_type, ChainType::Acked);
        assert_eq!(trailer.name_addr, "Carol <carol@x.com>");
    }

    #[test]
    fn test_non_trailer_lines_are_skipped() {
        assert!(match_trailer("Reported-by: someone").is_none());
        assert!(match_trailer("This was signed-off-by: nobody").is_none());
        assert!(match_trailer("Cc:").is_none());
        assert!(match_trailer("Cc:foo").is_none());
        assert!(match_trailer("Signed-off-by:A <a@x.com>").is_none());
        assert!(match_trailer("Signed-off-by:    ").is_none());
        assert!(match_trailer("").is_none());
    }

    #[test]
    fn test_message_without_trailers() {
        assert!(extract_chain("c1", "Just a subject\n\nand a body").is_empty());
        assert!(extract_chain("c1", "").is_empty());
    }
}
