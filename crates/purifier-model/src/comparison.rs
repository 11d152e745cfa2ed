//! Batch and comparison result types.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::record::ClassifiedRecord;

/// One bounded slice of an output sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch<T> {
    /// 0-based chunk number.
    pub index: usize,
    /// Logical offset of the first record in the full sequence.
    pub start: usize,
    /// Offset one past the last record.
    pub end: usize,
    pub label: String,
    pub records: Vec<T>,
}

impl<T> Batch<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A record that survived reconciliation, rendered in the export schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledRecord {
    pub record: ClassifiedRecord,
    /// Cell values in the order of [`ComparisonResult::columns`].
    pub values: Vec<String>,
}

impl ReconciledRecord {
    pub fn dedup_key(&self) -> Option<&str> {
        self.record.dedup_key()
    }
}

/// An overlapping dedup key kept for audit logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapSample {
    pub email: String,
    /// Input set names where the key survived, side A first.
    pub found_in: Vec<String>,
}

/// Symmetric difference of two classified sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Export column order for every [`ReconciledRecord`] below.
    pub columns: Vec<String>,
    pub unique_to_a: Vec<ReconciledRecord>,
    pub unique_to_b: Vec<ReconciledRecord>,
    /// `unique_to_a` followed by `unique_to_b`, deduplicated by key.
    pub combined: Vec<ReconciledRecord>,
    /// Distinct keys present on both sides.
    pub overlap_count: usize,
    pub overlap_samples: Vec<OverlapSample>,
}

impl ComparisonResult {
    pub fn unique_count(&self) -> usize {
        self.unique_to_a.len() + self.unique_to_b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combined.is_empty()
    }
}
