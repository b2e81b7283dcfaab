//! Accumulated combinations awaiting export.

use cascade_model::Combination;

/// Ordered combinations plus the count of entries added since the last export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinationLog {
    entries: Vec<Combination>,
    added: usize,
}

impl CombinationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, combination: Combination) -> usize {
        self.entries.push(combination);
        self.added += 1;
        self.added
    }

    pub fn entries(&self) -> &[Combination] {
        &self.entries
    }

    /// Entries added since the last export.
    pub fn counter(&self) -> usize {
        self.added
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empty the log and reset the counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.added = 0;
    }
}
