//! Row classification into valid, invalid, and duplicate records.

use std::time::Instant;

use tracing::{debug, error, info, info_span, trace};

use purifier_model::{
    ClassifiedRecord, ColumnKeywords, ColumnMapping, InputSet, InputSetResult, RawRow,
    RecordStatus, RejectReason, SetError, SourceSet,
};

use crate::columns::detect_columns;
use crate::email::EmailNormalizer;
use crate::redact::redact_value;
use crate::session::ReconciliationSession;

/// Where a row came from, shared by every row of one input set.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub input_set: &'a str,
    pub source_set: SourceSet,
    pub mapping: &'a ColumnMapping,
}

/// Keeps ASCII digits and a single leading `+`.
pub fn clean_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if trimmed.starts_with('+') && !digits.is_empty() {
        format!("+{digits}")
    } else {
        digits
    }
}

fn column_value<'r>(row: &'r RawRow, column: Option<&String>) -> &'r str {
    column
        .and_then(|column| row.get(column))
        .map_or("", str::trim)
}

/// Classifies one row. Valid rows admit their dedup key into `session`.
pub fn classify_row(
    row: &RawRow,
    context: &RowContext<'_>,
    normalizer: &EmailNormalizer,
    session: &mut ReconciliationSession,
) -> ClassifiedRecord {
    let mapping = context.mapping;
    let original_email = column_value(row, mapping.email_column.as_ref());
    let mut record = ClassifiedRecord {
        source_set: context.source_set,
        input_set: context.input_set.to_string(),
        line: row.line,
        name: column_value(row, mapping.name_column.as_ref()).to_string(),
        original_email: original_email.to_string(),
        email: None,
        phone: clean_phone(column_value(row, mapping.phone_column.as_ref())),
        status: RecordStatus::Invalid,
        reason: None,
    };

    if mapping.email_column.is_none() {
        record.reason = Some(RejectReason::Missing);
        return record;
    }

    match normalizer.normalize(original_email) {
        Err(reason) => {
            trace!(
                input_set = context.input_set,
                line = row.line,
                email = redact_value(original_email),
                reason = %reason,
                "row rejected"
            );
            record.reason = Some(reason);
        }
        Ok(email) => {
            if email.corrected {
                debug!(
                    input_set = context.input_set,
                    line = row.line,
                    from = redact_value(original_email),
                    to = redact_value(&email.display),
                    "domain corrected"
                );
            }
            record.status = if session.admit(&email.dedup_key) {
                RecordStatus::Valid
            } else {
                trace!(
                    input_set = context.input_set,
                    line = row.line,
                    email = redact_value(&email.display),
                    "duplicate row"
                );
                RecordStatus::Duplicate
            };
            record.email = Some(email);
        }
    }
    record
}

/// Classifies every row of `set` in input order.
///
/// A set without rows yields `EmptyInput`. A set without an email-like
/// header yields `MissingEmailColumn` and every row is counted invalid.
pub fn classify_input_set(
    set: &InputSet,
    source_set: SourceSet,
    keywords: &ColumnKeywords,
    normalizer: &EmailNormalizer,
    session: &mut ReconciliationSession,
) -> InputSetResult {
    let span = info_span!("input_set", input_set = %set.name, side = %source_set);
    let _guard = span.enter();
    let start = Instant::now();
    let mut result = InputSetResult::new(&set.name, source_set);

    if set.is_empty() {
        error!(input_set = %set.name, "input set has no data rows");
        result.error = Some(SetError::EmptyInput);
        return result;
    }

    let mapping = detect_columns(&set.headers, keywords);
    debug!(
        input_set = %set.name,
        email_column = mapping.email_column.as_deref().unwrap_or("-"),
        name_column = mapping.name_column.as_deref().unwrap_or("-"),
        phone_column = mapping.phone_column.as_deref().unwrap_or("-"),
        "columns detected"
    );

    if !mapping.has_email() {
        let error = SetError::MissingEmailColumn {
            headers: set.headers.clone(),
        };
        error!(input_set = %set.name, rows = set.row_count(), "{error}");
        result.stats.record_rejected_set(set.row_count());
        result.rejected = set
            .rows
            .iter()
            .map(|row| ClassifiedRecord {
                source_set,
                input_set: set.name.clone(),
                line: row.line,
                name: column_value(row, mapping.name_column.as_ref()).to_string(),
                original_email: String::new(),
                email: None,
                phone: clean_phone(column_value(row, mapping.phone_column.as_ref())),
                status: RecordStatus::Invalid,
                reason: Some(RejectReason::MissingEmailColumn),
            })
            .collect();
        result.error = Some(error);
        result.mapping = Some(mapping);
        return result;
    }

    let context = RowContext {
        input_set: &set.name,
        source_set,
        mapping: &mapping,
    };
    for row in &set.rows {
        let record = classify_row(row, &context, normalizer, session);
        result.stats.record(record.status);
        if record.email.as_ref().is_some_and(|email| email.corrected) {
            result.stats.record_correction();
        }
        if record.is_valid() {
            result.valid.push(record);
        } else {
            result.rejected.push(record);
        }
    }

    info!(
        input_set = %set.name,
        rows = result.stats.total,
        valid = result.stats.valid,
        invalid = result.stats.invalid,
        duplicates = result.stats.duplicates,
        corrected = result.stats.corrected,
        duration_ms = start.elapsed().as_millis(),
        "input set classified"
    );
    result.mapping = Some(mapping);
    result
}
