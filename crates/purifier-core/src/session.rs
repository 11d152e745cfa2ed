//! Dedup state for one run or one reconciliation side.

use std::collections::BTreeSet;

/// The set of dedup keys already admitted.
///
/// A session is created at run start (or per side in reconcile mode) and
/// dropped with the run. First admission of a key wins.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationSession {
    seen: BTreeSet<String>,
}

impl ReconciliationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Records `key`. Returns false if it was already seen.
    pub fn admit(&mut self, key: &str) -> bool {
        if self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
