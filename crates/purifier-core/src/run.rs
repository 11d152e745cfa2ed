//! Run aggregation for purify and reconcile modes.

use std::collections::BTreeSet;
use std::time::Instant;

use tracing::{error, info, info_span, warn};

use purifier_model::{
    BufferKind, ComparisonResult, InputSet, InputSetResult, InputSetSource, Mode, OutputBuffer,
    PurifierOptions, Result, RunOutcome, RunResult, RunStats, SetError, SourceSet,
};

use crate::classify::classify_input_set;
use crate::corrections::DomainCorrections;
use crate::email::EmailNormalizer;
use crate::export::{
    MERGED_FILE_NAME, PURIFIED_ARCHIVE, REJECTED_FILE_NAME, chunk_buffers, cleaned_file_name,
    purified_buffer, reconciled_buffer, rejected_buffer, unique_file_name,
};
use crate::reconcile::{SideRecords, export_columns, reconcile};
use crate::session::ReconciliationSession;

/// Classified input sets of one side. Failed sources keep `None`.
type Classified = Vec<(Option<InputSet>, InputSetResult)>;

fn classify_sources(
    sources: Vec<InputSetSource>,
    side: SourceSet,
    options: &PurifierOptions,
    normalizer: &EmailNormalizer,
) -> Classified {
    let mut session = ReconciliationSession::new();
    let mut classified = Vec::with_capacity(sources.len());
    for source in sources {
        match source {
            InputSetSource::Loaded(set) => {
                let result =
                    classify_input_set(&set, side, &options.columns, normalizer, &mut session);
                classified.push((Some(set), result));
            }
            InputSetSource::Failed { name, message } => {
                error!(input_set = %name, side = %side, error = %message, "input set failed to parse");
                let result = InputSetResult::failed(name, side, SetError::ParseFailure { message });
                classified.push((None, result));
            }
        }
    }
    classified
}

fn build_normalizer(options: &PurifierOptions, mode: Mode) -> Result<EmailNormalizer> {
    options.validate()?;
    options.check_mode(mode)?;
    let corrections = DomainCorrections::with_extra(&options.corrections)?;
    Ok(EmailNormalizer::new(corrections))
}

fn total_stats(classified: &[(Option<InputSet>, InputSetResult)]) -> RunStats {
    classified.iter().map(|(_, result)| &result.stats).sum()
}

/// Cleans one or more input sets, merging them when there are several.
///
/// One session spans the whole run, so an address seen in an earlier input
/// set is a duplicate in every later one.
pub fn run_purify(sources: Vec<InputSetSource>, options: &PurifierOptions) -> Result<RunResult> {
    let normalizer = build_normalizer(options, Mode::Purify)?;
    let span = info_span!("run", mode = Mode::Purify.as_str());
    let _guard = span.enter();
    let start = Instant::now();

    let classified = classify_sources(sources, SourceSet::Primary, options, &normalizer);
    let stats = total_stats(&classified);
    let results: Vec<InputSetResult> = classified.into_iter().map(|(_, result)| result).collect();
    let outcome = if stats.valid == 0 {
        RunOutcome::Empty
    } else {
        RunOutcome::Complete
    };

    let output_span = info_span!("output");
    let artifacts = output_span.in_scope(|| purify_artifacts(&results, outcome, options))?;

    if outcome == RunOutcome::Empty {
        warn!(input_sets = results.len(), rows = stats.total, "no valid records found");
    }
    info!(
        input_sets = results.len(),
        rows = stats.total,
        valid = stats.valid,
        invalid = stats.invalid,
        duplicates = stats.duplicates,
        corrected = stats.corrected,
        artifacts = artifacts.len(),
        duration_ms = start.elapsed().as_millis(),
        "purify complete"
    );

    Ok(RunResult {
        mode: Mode::Purify,
        outcome,
        stats,
        input_sets: results,
        comparison: None,
        artifacts,
    })
}

fn purify_artifacts(
    results: &[InputSetResult],
    outcome: RunOutcome,
    options: &PurifierOptions,
) -> Result<Vec<OutputBuffer>> {
    let mut artifacts = Vec::new();
    if outcome == RunOutcome::Complete {
        let mut taken = BTreeSet::new();
        for result in results.iter().filter(|result| !result.valid.is_empty()) {
            let file_name = unique_file_name(&cleaned_file_name(&result.name), &mut taken);
            artifacts.push(purified_buffer(BufferKind::Cleaned, file_name, &result.valid));
        }
        let loaded = results.iter().filter(|result| !result.is_parse_failure()).count();
        let all_valid = results.iter().flat_map(|result| &result.valid);
        let merged = purified_buffer(BufferKind::Merged, MERGED_FILE_NAME, all_valid);
        if options.batch.enabled {
            artifacts.extend(chunk_buffers(
                BufferKind::Merged,
                PURIFIED_ARCHIVE,
                &merged.columns,
                &merged.rows,
                options.chunk_size,
                &options.batch,
            )?);
        }
        if loaded > 1 {
            artifacts.push(merged);
        }
    }
    if options.export_rejected {
        let rejected = rejected_buffer(
            REJECTED_FILE_NAME,
            results.iter().flat_map(|result| &result.rejected),
        );
        if rejected.row_count() > 0 {
            artifacts.push(rejected);
        }
    }
    Ok(artifacts)
}

/// Compares side A with side B and keeps the records exclusive to either.
///
/// Each side is deduplicated with its own session before comparison.
pub fn run_reconcile(
    a: Vec<InputSetSource>,
    b: Vec<InputSetSource>,
    options: &PurifierOptions,
) -> Result<RunResult> {
    let normalizer = build_normalizer(options, Mode::Reconcile)?;
    let span = info_span!("run", mode = Mode::Reconcile.as_str());
    let _guard = span.enter();
    let start = Instant::now();

    let side_a = classify_sources(a, SourceSet::A, options, &normalizer);
    let side_b = classify_sources(b, SourceSet::B, options, &normalizer);
    for (side, classified) in [(SourceSet::A, &side_a), (SourceSet::B, &side_b)] {
        let stats = total_stats(classified);
        info!(
            side = %side,
            rows = stats.total,
            valid = stats.valid,
            invalid = stats.invalid,
            duplicates = stats.duplicates,
            corrected = stats.corrected,
            "side classified"
        );
    }

    let comparison = info_span!("reconcile").in_scope(|| compare_sides(&side_a, &side_b, options));

    let mut stats = total_stats(&side_a);
    stats.absorb(&total_stats(&side_b));
    let results: Vec<InputSetResult> = side_a
        .into_iter()
        .chain(side_b)
        .map(|(_, result)| result)
        .collect();
    let outcome = if comparison.is_empty() {
        RunOutcome::Empty
    } else {
        RunOutcome::Complete
    };

    let output_span = info_span!("output");
    let artifacts =
        output_span.in_scope(|| reconcile_artifacts(&comparison, &results, options))?;

    if outcome == RunOutcome::Empty {
        warn!(
            overlap = comparison.overlap_count,
            "no unique records on either side"
        );
    }
    info!(
        rows = stats.total,
        unique_a = comparison.unique_to_a.len(),
        unique_b = comparison.unique_to_b.len(),
        combined = comparison.combined.len(),
        overlap = comparison.overlap_count,
        artifacts = artifacts.len(),
        duration_ms = start.elapsed().as_millis(),
        "reconcile complete"
    );

    Ok(RunResult {
        mode: Mode::Reconcile,
        outcome,
        stats,
        input_sets: results,
        comparison: Some(comparison),
        artifacts,
    })
}

fn loaded(classified: &[(Option<InputSet>, InputSetResult)]) -> Vec<(&InputSet, &InputSetResult)> {
    classified
        .iter()
        .filter_map(|(set, result)| set.as_ref().map(|set| (set, result)))
        .collect()
}

fn compare_sides(
    side_a: &[(Option<InputSet>, InputSetResult)],
    side_b: &[(Option<InputSet>, InputSetResult)],
    options: &PurifierOptions,
) -> ComparisonResult {
    let loaded_a = loaded(side_a);
    let loaded_b = loaded(side_b);

    let headers = loaded_a
        .iter()
        .chain(&loaded_b)
        .map(|(set, _)| set.headers.as_slice());
    let columns = export_columns(options.reconcile.schema, headers);

    let records_a = SideRecords::collect(loaded_a.iter().copied());
    let records_b = SideRecords::collect(loaded_b.iter().copied());
    reconcile(&records_a, &records_b, columns, &options.reconcile)
}

fn reconcile_artifacts(
    comparison: &ComparisonResult,
    results: &[InputSetResult],
    options: &PurifierOptions,
) -> Result<Vec<OutputBuffer>> {
    let mut artifacts = Vec::new();
    let outputs = [
        ("unique_file_A", comparison.unique_to_a.as_slice()),
        ("unique_file_B", comparison.unique_to_b.as_slice()),
        ("unique_combined", comparison.combined.as_slice()),
    ];
    for (stem, records) in outputs {
        if records.is_empty() {
            continue;
        }
        let buffer = reconciled_buffer(format!("{stem}.csv"), &comparison.columns, records);
        if options.batch.enabled {
            artifacts.extend(chunk_buffers(
                BufferKind::Unique,
                &format!("{stem}_chunks"),
                &buffer.columns,
                &buffer.rows,
                options.chunk_size,
                &options.batch,
            )?);
        }
        artifacts.push(buffer);
    }

    if options.export_rejected {
        for side in [SourceSet::A, SourceSet::B] {
            let rejected = rejected_buffer(
                format!("rejected_file_{side}.csv"),
                results
                    .iter()
                    .filter(|result| result.source_set == side)
                    .flat_map(|result| &result.rejected),
            );
            if rejected.row_count() > 0 {
                artifacts.push(rejected);
            }
        }
    }
    Ok(artifacts)
}
