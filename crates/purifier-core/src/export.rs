//! Builders for the named output buffers of a run.

use std::collections::BTreeSet;

use purifier_model::{
    BatchOptions, BufferKind, ClassifiedRecord, OutputBuffer, PURIFIED_COLUMNS, REJECTED_COLUMNS,
    ReconciledRecord, Result,
};

use crate::batch::{chunk_file_name, partition};

pub const MERGED_FILE_NAME: &str = "merged_purified_data.csv";
pub const PURIFIED_ARCHIVE: &str = "cleaned_data_archive";
pub const REJECTED_FILE_NAME: &str = "rejected_records.csv";

fn column_names(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|column| (*column).to_string()).collect()
}

/// `cleaned_<name>`, with a `.csv` extension added when missing.
pub fn cleaned_file_name(input_set: &str) -> String {
    if input_set.to_ascii_lowercase().ends_with(".csv") {
        format!("cleaned_{input_set}")
    } else {
        format!("cleaned_{input_set}.csv")
    }
}

/// Returns `file_name`, or `stem_N.ext` with the lowest free `N >= 2` when
/// the name was already taken, and records the result in `taken`.
pub fn unique_file_name(file_name: &str, taken: &mut BTreeSet<String>) -> String {
    if taken.insert(file_name.to_string()) {
        return file_name.to_string();
    }
    let (stem, extension) = match file_name.rfind('.') {
        Some(dot) if dot > 0 => file_name.split_at(dot),
        _ => (file_name, ""),
    };
    let mut suffix = 2;
    loop {
        let candidate = format!("{stem}_{suffix}{extension}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        suffix += 1;
    }
}

fn purified_row(record: &ClassifiedRecord) -> Vec<String> {
    vec![
        record.name.clone(),
        record.display_email().to_string(),
        record.phone.clone(),
    ]
}

fn rejected_row(record: &ClassifiedRecord) -> Vec<String> {
    vec![
        record.name.clone(),
        record.original_email.clone(),
        record.phone.clone(),
        record.status_label(),
    ]
}

/// `Name, Email, Phone` rows for valid records.
pub fn purified_buffer<'r>(
    kind: BufferKind,
    file_name: impl Into<String>,
    records: impl IntoIterator<Item = &'r ClassifiedRecord>,
) -> OutputBuffer {
    let mut buffer = OutputBuffer::new(kind, file_name, column_names(&PURIFIED_COLUMNS));
    buffer.rows = records.into_iter().map(purified_row).collect();
    buffer
}

/// `Name, OriginalEmail, Phone, Status` rows for invalid and duplicate records.
pub fn rejected_buffer<'r>(
    file_name: impl Into<String>,
    records: impl IntoIterator<Item = &'r ClassifiedRecord>,
) -> OutputBuffer {
    let mut buffer = OutputBuffer::new(
        BufferKind::Rejected,
        file_name,
        column_names(&REJECTED_COLUMNS),
    );
    buffer.rows = records.into_iter().map(rejected_row).collect();
    buffer
}

pub fn reconciled_buffer(
    file_name: impl Into<String>,
    columns: &[String],
    records: &[ReconciledRecord],
) -> OutputBuffer {
    let mut buffer = OutputBuffer::new(BufferKind::Unique, file_name, columns.to_vec());
    buffer.rows = records.iter().map(|record| record.values.clone()).collect();
    buffer
}

/// Partitions already-rendered rows into chunk buffers inside `archive`.
pub fn chunk_buffers(
    kind: BufferKind,
    archive: &str,
    columns: &[String],
    rows: &[Vec<String>],
    chunk_size: usize,
    batch: &BatchOptions,
) -> Result<Vec<OutputBuffer>> {
    let batches = partition(rows, chunk_size, batch.label_style)?;
    Ok(batches
        .into_iter()
        .map(|chunk| {
            let mut buffer = OutputBuffer::new(
                kind,
                chunk_file_name(&batch.file_prefix, &chunk.label),
                columns.to_vec(),
            )
            .in_archive(archive, chunk.index);
            buffer.rows = chunk.records;
            buffer
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaned_names_keep_or_add_extension() {
        assert_eq!(cleaned_file_name("leads.csv"), "cleaned_leads.csv");
        assert_eq!(cleaned_file_name("LEADS.CSV"), "cleaned_LEADS.CSV");
        assert_eq!(cleaned_file_name("export"), "cleaned_export.csv");
    }

    #[test]
    fn colliding_names_get_numbered_suffixes() {
        let mut taken = BTreeSet::new();
        assert_eq!(unique_file_name("cleaned_leads.csv", &mut taken), "cleaned_leads.csv");
        assert_eq!(unique_file_name("cleaned_leads.csv", &mut taken), "cleaned_leads_2.csv");
        assert_eq!(unique_file_name("cleaned_leads.csv", &mut taken), "cleaned_leads_3.csv");
        assert_eq!(unique_file_name("cleaned_other.csv", &mut taken), "cleaned_other.csv");
        assert_eq!(unique_file_name("export", &mut taken), "export");
        assert_eq!(unique_file_name("export", &mut taken), "export_2");
    }

    #[test]
    fn chunk_buffers_carry_archive_and_index() {
        let rows: Vec<Vec<String>> = (0..5).map(|i| vec![i.to_string()]).collect();
        let buffers = chunk_buffers(
            BufferKind::Merged,
            PURIFIED_ARCHIVE,
            &["N".to_string()],
            &rows,
            2,
            &BatchOptions::default(),
        )
        .expect("chunk");
        let names: Vec<&str> = buffers.iter().map(|b| b.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "SDP-1-2 Data Import.csv",
                "SDP-3-4 Data Import.csv",
                "SDP-5-5 Data Import.csv"
            ]
        );
        assert_eq!(buffers[2].chunk_index, Some(2));
        assert_eq!(buffers[0].archive.as_deref(), Some(PURIFIED_ARCHIVE));
        assert_eq!(buffers[2].rows, vec![vec!["4".to_string()]]);
    }
}
