use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of trailer found in a commit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainType {
    Signed,
    Acked,
    Reviewed,
    Tested,
    Cc,
}

impl ChainType {
    pub const ALL: [ChainType; 5] = [
        ChainType::Signed,
        ChainType::Acked,
        ChainType::Reviewed,
        ChainType::Tested,
        ChainType::Cc,
    ];

    /// Map a trailer label (`Signed-off-by`, `CC`, ...) to its type, ignoring case
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "signed-off-by" => Some(ChainType::Signed),
            "acked-by" => Some(ChainType::Acked),
            "reviewed-by" => Some(ChainType::Reviewed),
            "tested-by" => Some(ChainType::Tested),
            "cc" => Some(ChainType::Cc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChainType::Signed => "signed",
            ChainType::Acked => "acked",
            ChainType::Reviewed => "reviewed",
            ChainType::Tested => "tested",
            ChainType::Cc => "cc",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    pub commit: String,
    /// Text after the trailer label, e.g. `Alice <a@x.com>`.
    pub name_addr: String,
    pub chain_type: ChainType,
    /// Zero-based position among entries of the same type in this commit.
    pub ordinal: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_is_case_insensitive() {
        assert_eq!(ChainType::from_label("Signed-off-by"), Some(ChainType::Signed));
        assert_eq!(ChainType::from_label("ACKED-BY"), Some(ChainType::Acked));
        assert_eq!(ChainType::from_label("reviewed-by"), Some(ChainType::Reviewed));
        assert_eq!(ChainType::from_label("Tested-By"), Some(ChainType::Tested));
        assert_eq!(ChainType::from_label("Cc"), Some(ChainType::Cc));
        assert_eq!(ChainType::from_label("Reported-by"), None);
    }

    #[test]
    fn test_chain_type_serializes_lowercase() {
        let json = serde_json::to_string(&ChainType::Reviewed).unwrap();
        assert_eq!(json, "\"reviewed\"");
        let back: ChainType = serde_json::from_str("\"signed\"").unwrap();
        assert_eq!(back, ChainType::Signed);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, t) in ChainType::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
        }
    }
}
