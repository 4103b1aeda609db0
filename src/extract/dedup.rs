use std::collections::HashSet;

/// How much of a block needs extracting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// First sighting: header, parents, diffstat and trailers.
    Full,
    /// Already known: only repository and ref associations.
    AssociationsOnly,
}

/// Known commit ids for one extraction run.
///
/// Seeded from the store before the run and extended as new commits are admitted,
/// so a commit listed twice in one stream is only extracted once.
#[derive(Debug, Clone, Default)]
pub struct DedupGate {
    known: HashSet<String>,
}

impl DedupGate {
    pub fn new(known: impl IntoIterator<Item = String>) -> Self {
        Self { known: known.into_iter().collect() }
    }

    /// Decide the extraction depth for `id`, marking it known when it is new.
    pub fn admit(&mut self, id: &str) -> Extraction {
        if self.known.contains(id) {
            Extraction::AssociationsOnly
        } else {
            self.known.insert(id.to_string());
            Extraction::Full
        }
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.known.contains(id)
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    pub fn into_known(self) -> HashSet<String> {
        self.known
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_commit_is_admitted_once() {
        let mut gate = DedupGate::default();
        assert_eq!(gate.admit("abc"), Extraction::Full);
        assert_eq!(gate.admit("abc"), Extraction::AssociationsOnly);
        assert!(gate.is_known("abc"));
        assert_eq!(gate.len(), 1);
    }

    #[test]
    fn test_seeded_commit_is_associations_only() {
        let mut gate = DedupGate::new(vec!["abc".to_string()]);
        assert_eq!(gate.admit("abc"), Extraction::AssociationsOnly);
        assert_eq!(gate.admit("def"), Extraction::Full);
        assert_eq!(gate.into_known().len(), 2);
    }
}
