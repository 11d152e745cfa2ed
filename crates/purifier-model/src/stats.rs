use serde::{Deserialize, Serialize};

use crate::record::RecordStatus;

/// Row counters for an input set, a side, or a whole run.
///
/// Counters only ever grow during a run; a fresh value is created at run start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub duplicates: usize,
    /// Addresses whose domain was rewritten by the typo table.
    pub corrected: usize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one classified row.
    pub fn record(&mut self, status: RecordStatus) {
        self.total += 1;
        match status {
            RecordStatus::Valid => self.valid += 1,
            RecordStatus::Invalid => self.invalid += 1,
            RecordStatus::Duplicate => self.duplicates += 1,
        }
    }

    /// Counts `count` rows rejected without row-level processing.
    pub fn record_rejected_set(&mut self, count: usize) {
        self.total += count;
        self.invalid += count;
    }

    pub fn record_correction(&mut self) {
        self.corrected += 1;
    }

    /// Adds another counter set into this one.
    pub fn absorb(&mut self, other: &RunStats) {
        self.total += other.total;
        self.valid += other.valid;
        self.invalid += other.invalid;
        self.duplicates += other.duplicates;
        self.corrected += other.corrected;
    }

    /// Every counted row landed in exactly one bucket.
    pub fn is_balanced(&self) -> bool {
        self.valid + self.invalid + self.duplicates == self.total
    }

    /// Invalid plus duplicate rows.
    pub fn filtered(&self) -> usize {
        self.invalid + self.duplicates
    }
}

impl<'a> std::iter::Sum<&'a RunStats> for RunStats {
    fn sum<I: Iterator<Item = &'a RunStats>>(iter: I) -> Self {
        let mut total = RunStats::default();
        for stats in iter {
            total.absorb(stats);
        }
        total
    }
}
