//! Input rows and classified records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One input line keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// 1-based data line number within the input set (the header is not counted).
    pub line: usize,
    pub values: BTreeMap<String, String>,
}

impl RawRow {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    /// Value of `column`, if the row has one.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// The rows of one source (usually one CSV file) with its declared headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl InputSet {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Builds an input set from positional records.
    ///
    /// Cells beyond the header count are dropped, missing cells become empty
    /// strings. When a header repeats, the first column with that name wins.
    pub fn from_records<I, R, S>(name: impl Into<String>, headers: Vec<String>, records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new(name, headers);
        for (idx, record) in records.into_iter().enumerate() {
            let mut cells = record.into_iter().map(Into::into);
            let mut row = RawRow::new(idx + 1);
            for header in &set.headers {
                let value = cells.next().unwrap_or_default();
                row.values.entry(header.clone()).or_insert(value);
            }
            set.rows.push(row);
        }
        set
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What the parsing collaborator hands to the aggregator for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSetSource {
    Loaded(InputSet),
    Failed { name: String, message: String },
}

impl InputSetSource {
    pub fn name(&self) -> &str {
        match self {
            Self::Loaded(set) => &set.name,
            Self::Failed { name, .. } => name,
        }
    }
}

impl From<InputSet> for InputSetSource {
    fn from(set: InputSet) -> Self {
        Self::Loaded(set)
    }
}

/// Columns resolved for an input set by header detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub email_column: Option<String>,
    pub name_column: Option<String>,
    pub phone_column: Option<String>,
}

impl ColumnMapping {
    pub fn has_email(&self) -> bool {
        self.email_column.is_some()
    }
}

/// Which side of a run a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceSet {
    /// Purify mode has a single side.
    Primary,
    A,
    B,
}

impl SourceSet {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::A => "A",
            Self::B => "B",
        }
    }
}

impl fmt::Display for SourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Valid,
    Invalid,
    Duplicate,
}

/// Why a row was classified as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    /// Email column unresolved or value empty.
    Missing,
    /// Structural validation failed after correction.
    InvalidFormat,
    /// The whole input set had no email-like header.
    MissingEmailColumn,
    EmptyInput,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::InvalidFormat => "invalid-format",
            Self::MissingEmailColumn => "missing-email-column",
            Self::EmptyInput => "empty-input",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A corrected, validated email address.
///
/// `display` keeps the local-part casing of the input; `dedup_key` is the
/// fully lowercased form used only for uniqueness checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedEmail {
    pub display: String,
    pub dedup_key: String,
    pub corrected: bool,
}

/// Outcome of classifying one input row. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub source_set: SourceSet,
    /// Name of the input set the row came from.
    pub input_set: String,
    pub line: usize,
    pub name: String,
    /// Trimmed email value as it appeared in the input.
    pub original_email: String,
    /// Present for valid and duplicate rows.
    pub email: Option<NormalizedEmail>,
    /// Digits with at most one leading `+`.
    pub phone: String,
    pub status: RecordStatus,
    pub reason: Option<RejectReason>,
}

impl ClassifiedRecord {
    pub fn is_valid(&self) -> bool {
        self.status == RecordStatus::Valid
    }

    /// Display email, or an empty string for invalid rows.
    pub fn display_email(&self) -> &str {
        self.email.as_ref().map_or("", |email| email.display.as_str())
    }

    pub fn dedup_key(&self) -> Option<&str> {
        self.email.as_ref().map(|email| email.dedup_key.as_str())
    }

    /// Human-readable status used by the rejected-row export.
    pub fn status_label(&self) -> String {
        match (self.status, self.reason) {
            (RecordStatus::Valid, _) => "Valid".to_string(),
            (RecordStatus::Duplicate, _) => "Duplicate".to_string(),
            (RecordStatus::Invalid, Some(reason)) => format!("Invalid: {reason}"),
            (RecordStatus::Invalid, None) => "Invalid".to_string(),
        }
    }
}
