//! Run results handed to the export collaborator.

use serde::{Deserialize, Serialize};

use crate::comparison::ComparisonResult;
use crate::error::SetError;
use crate::options::Mode;
use crate::record::{ClassifiedRecord, ColumnMapping, SourceSet};
use crate::stats::RunStats;

pub const PURIFIED_COLUMNS: [&str; 3] = ["Name", "Email", "Phone"];
pub const CONTACT_COLUMNS: [&str; 3] = ["First Name", "Last Name", "Email"];
pub const REJECTED_COLUMNS: [&str; 4] = ["Name", "OriginalEmail", "Phone", "Status"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BufferKind {
    /// Valid rows of a single input set.
    Cleaned,
    /// Valid rows of every input set, in input order.
    Merged,
    /// Records exclusive to one side, or to either side.
    Unique,
    /// Invalid and duplicate rows with their status.
    Rejected,
}

/// A named, serializable table ready to be written by the export layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputBuffer {
    pub kind: BufferKind,
    pub file_name: String,
    /// Archive (directory) the buffer belongs to when batching is active.
    pub archive: Option<String>,
    pub chunk_index: Option<usize>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl OutputBuffer {
    pub fn new(kind: BufferKind, file_name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            archive: None,
            chunk_index: None,
            columns,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn in_archive(mut self, archive: impl Into<String>, chunk_index: usize) -> Self {
        self.archive = Some(archive.into());
        self.chunk_index = Some(chunk_index);
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_chunk(&self) -> bool {
        self.chunk_index.is_some()
    }
}

/// Per-input-set outcome kept for reporting and rejected-row export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSetResult {
    pub name: String,
    pub source_set: SourceSet,
    pub mapping: Option<ColumnMapping>,
    pub stats: RunStats,
    pub error: Option<SetError>,
    pub valid: Vec<ClassifiedRecord>,
    /// Invalid and duplicate rows in input order.
    pub rejected: Vec<ClassifiedRecord>,
}

impl InputSetResult {
    pub fn new(name: impl Into<String>, source_set: SourceSet) -> Self {
        Self {
            name: name.into(),
            source_set,
            mapping: None,
            stats: RunStats::default(),
            error: None,
            valid: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub fn failed(name: impl Into<String>, source_set: SourceSet, error: SetError) -> Self {
        Self {
            error: Some(error),
            ..Self::new(name, source_set)
        }
    }

    pub fn is_parse_failure(&self) -> bool {
        matches!(self.error, Some(SetError::ParseFailure { .. }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Complete,
    /// No valid (purify) or unique (reconcile) records. Nothing to export.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub mode: Mode,
    pub outcome: RunOutcome,
    /// Totals over every input set in the run.
    pub stats: RunStats,
    pub input_sets: Vec<InputSetResult>,
    pub comparison: Option<ComparisonResult>,
    pub artifacts: Vec<OutputBuffer>,
}

impl RunResult {
    pub fn is_empty(&self) -> bool {
        self.outcome == RunOutcome::Empty
    }

    /// Stats summed over the input sets of one side.
    pub fn side_stats(&self, side: SourceSet) -> RunStats {
        self.input_sets
            .iter()
            .filter(|set| set.source_set == side)
            .map(|set| &set.stats)
            .sum()
    }

    pub fn parse_failures(&self) -> impl Iterator<Item = &InputSetResult> {
        self.input_sets.iter().filter(|set| set.is_parse_failure())
    }

    pub fn has_parse_failures(&self) -> bool {
        self.parse_failures().next().is_some()
    }
}
