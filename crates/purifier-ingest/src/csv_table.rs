//! CSV files to input sets.

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, warn};

use purifier_model::{InputSet, InputSetSource};

use crate::error::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Display name of an input file: its file name, or the full path when it
/// has none.
pub fn input_set_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or_else(|| path.display().to_string(), str::to_string)
}

/// Reads a CSV file into an input set.
///
/// The first non-empty record is the header row. Blank records are skipped,
/// short records are padded, and a leading byte-order mark is dropped.
/// Header names are trimmed with inner whitespace collapsed; cell values are
/// kept exactly as written. A file
/// with no records yields an input set without headers or rows.
pub fn read_input_set(path: &Path) -> Result<InputSet> {
    let csv_error = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut headers: Option<Vec<String>> = None;
    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        if headers.is_none() {
            headers = Some(record.iter().map(normalize_header).collect());
        } else {
            records.push(record.iter().map(str::to_string).collect());
        }
    }

    let set = InputSet::from_records(input_set_name(path), headers.unwrap_or_default(), records);
    debug!(
        input_set = %set.name,
        columns = set.headers.len(),
        rows = set.row_count(),
        "csv loaded"
    );
    Ok(set)
}

/// Reads one file, turning a read failure into [`InputSetSource::Failed`].
pub fn load_input_source(path: &Path) -> InputSetSource {
    match read_input_set(path) {
        Ok(set) => InputSetSource::Loaded(set),
        Err(error) => {
            warn!(path = %path.display(), %error, "input could not be read");
            InputSetSource::Failed {
                name: input_set_name(path),
                message: error.to_string(),
            }
        }
    }
}

/// Reads every path in order. Failures are kept in place as
/// [`InputSetSource::Failed`] so the run can continue.
pub fn load_input_sources(paths: &[PathBuf]) -> Vec<InputSetSource> {
    paths.iter().map(|path| load_input_source(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_whitespace_is_collapsed() {
        assert_eq!(normalize_header("\u{feff} Full   Name "), "Full Name");
    }

    #[test]
    fn name_falls_back_to_display_path() {
        assert_eq!(input_set_name(Path::new("/tmp/leads.csv")), "leads.csv");
        assert_eq!(input_set_name(Path::new("/")), "/");
    }
}
