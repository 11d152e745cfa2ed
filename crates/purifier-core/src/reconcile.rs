//! Symmetric difference of two classified sides.

use std::collections::{BTreeSet, HashMap};

use tracing::{info, warn};

use purifier_model::{
    CONTACT_COLUMNS, ClassifiedRecord, ComparisonResult, InputSet, InputSetResult,
    OverlapSample, RawRow, ReconcileOptions, ReconcileSchema, ReconciledRecord,
};

use crate::contact::contact_name;
use crate::redact::redact_value;

/// A surviving record paired with the row it was read from and the ordered
/// headers of its input set.
#[derive(Debug, Clone, Copy)]
pub struct SideEntry<'a> {
    pub record: &'a ClassifiedRecord,
    pub row: &'a RawRow,
    pub headers: &'a [String],
}

impl SideEntry<'_> {
    fn key(&self) -> &str {
        self.record.dedup_key().unwrap_or_default()
    }

    fn origin(&self) -> String {
        format!("{} ({})", self.record.source_set, self.record.input_set)
    }
}

/// The keyed, deduplicated records of one side, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct SideRecords<'a> {
    entries: Vec<SideEntry<'a>>,
    index: HashMap<&'a str, usize>,
}

impl<'a> SideRecords<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the valid records of each classified set with their rows.
    pub fn collect(sets: impl IntoIterator<Item = (&'a InputSet, &'a InputSetResult)>) -> Self {
        let mut records = Self::new();
        for (set, result) in sets {
            for record in &result.valid {
                if let Some(row) = row_for_line(set, record.line) {
                    records.insert(record, row, &set.headers);
                }
            }
        }
        records
    }

    /// Adds a valid record. Returns false for records without a key or with
    /// a key already present.
    pub fn insert(
        &mut self,
        record: &'a ClassifiedRecord,
        row: &'a RawRow,
        headers: &'a [String],
    ) -> bool {
        let Some(key) = record.dedup_key() else {
            return false;
        };
        if self.index.contains_key(key) {
            return false;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push(SideEntry {
            record,
            row,
            headers,
        });
        true
    }

    pub fn get(&self, key: &str) -> Option<&SideEntry<'a>> {
        self.index.get(key).map(|&idx| &self.entries[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SideEntry<'a>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn row_for_line(set: &InputSet, line: usize) -> Option<&RawRow> {
    line.checked_sub(1)
        .and_then(|idx| set.rows.get(idx))
        .filter(|row| row.line == line)
        .or_else(|| set.rows.iter().find(|row| row.line == line))
}

/// Export columns for `schema`.
///
/// Passthrough keeps every header of side A in order, followed by headers
/// only side B declares.
pub fn export_columns<'h>(
    schema: ReconcileSchema,
    headers: impl IntoIterator<Item = &'h [String]>,
) -> Vec<String> {
    match schema {
        ReconcileSchema::Contact => CONTACT_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
        ReconcileSchema::Passthrough => {
            let mut seen = BTreeSet::new();
            let mut columns = Vec::new();
            for header in headers.into_iter().flatten() {
                if seen.insert(header.as_str()) {
                    columns.push(header.clone());
                }
            }
            columns
        }
    }
}

fn render(entry: &SideEntry<'_>, columns: &[String], options: &ReconcileOptions) -> ReconciledRecord {
    let values = match options.schema {
        ReconcileSchema::Contact => {
            let name = contact_name(entry.row, entry.headers, &options.name_placeholder);
            vec![name.first, name.last, entry.record.display_email().to_string()]
        }
        ReconcileSchema::Passthrough => columns
            .iter()
            .map(|column| entry.row.get(column).unwrap_or_default().to_string())
            .collect(),
    };
    ReconciledRecord {
        record: entry.record.clone(),
        values,
    }
}

/// Computes unique-to-A, unique-to-B, and their combined union.
///
/// A key present on both sides is an overlap: it appears in no output and is
/// counted once however many times it is seen.
pub fn reconcile(
    a: &SideRecords<'_>,
    b: &SideRecords<'_>,
    columns: Vec<String>,
    options: &ReconcileOptions,
) -> ComparisonResult {
    let mut overlap_keys: BTreeSet<&str> = BTreeSet::new();
    let mut overlap_samples = Vec::new();
    let mut note_overlap = |key, from_a: &SideEntry<'_>, from_b: &SideEntry<'_>| {
        if overlap_keys.insert(key) && overlap_samples.len() < options.overlap_sample_limit {
            overlap_samples.push(OverlapSample {
                email: key.to_string(),
                found_in: vec![from_a.origin(), from_b.origin()],
            });
        }
    };

    let mut unique_to_a = Vec::new();
    for entry in a.iter() {
        let key = entry.key();
        match b.get(key) {
            Some(other) => note_overlap(key, entry, other),
            None => unique_to_a.push(render(entry, &columns, options)),
        }
    }

    let mut unique_to_b = Vec::new();
    for entry in b.iter() {
        let key = entry.key();
        match a.get(key) {
            Some(other) => note_overlap(key, other, entry),
            None => unique_to_b.push(render(entry, &columns, options)),
        }
    }

    let mut combined_keys = BTreeSet::new();
    let combined: Vec<ReconciledRecord> = unique_to_a
        .iter()
        .chain(&unique_to_b)
        .filter(|record| combined_keys.insert(record.dedup_key().unwrap_or_default().to_string()))
        .cloned()
        .collect();

    let result = ComparisonResult {
        columns,
        unique_to_a,
        unique_to_b,
        combined,
        overlap_count: overlap_keys.len(),
        overlap_samples,
    };
    info!(
        side_a = a.len(),
        side_b = b.len(),
        unique_a = result.unique_to_a.len(),
        unique_b = result.unique_to_b.len(),
        overlap = result.overlap_count,
        "reconciliation complete"
    );
    log_skip_details(&result);
    result
}

fn log_skip_details(result: &ComparisonResult) {
    if result.overlap_count == 0 {
        return;
    }
    warn!(overlap = result.overlap_count, "skipped records present in both sides");
    for sample in &result.overlap_samples {
        warn!(
            email = redact_value(&sample.email),
            found_in = %sample.found_in.join(", "),
            "[SKIP]"
        );
    }
    let remaining = result.overlap_count.saturating_sub(result.overlap_samples.len());
    if remaining > 0 {
        warn!("... and {remaining} more");
    }
}
