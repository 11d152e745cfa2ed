//! JSON run report.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use purifier_model::{
    BufferKind, Mode, OverlapSample, RunOutcome, RunResult, RunStats, SetError, SourceSet,
};

use crate::error::{OutputError, Result};
use crate::writer::buffer_path;

pub const REPORT_FILE_NAME: &str = "run_report.json";
const REPORT_SCHEMA: &str = "contact-purifier/run-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub mode: Mode,
    pub outcome: RunOutcome,
    pub stats: RunStats,
    pub input_sets: Vec<InputSetSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonSummary>,
    pub artifacts: Vec<ArtifactSummary>,
}

#[derive(Debug, Serialize)]
pub struct InputSetSummary {
    pub name: String,
    pub side: SourceSet,
    pub email_column: Option<String>,
    pub stats: RunStats,
    pub error: Option<SetError>,
}

#[derive(Debug, Serialize)]
pub struct ComparisonSummary {
    pub unique_to_a: usize,
    pub unique_to_b: usize,
    pub combined: usize,
    pub overlap_count: usize,
    pub overlap_samples: Vec<OverlapSample>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactSummary {
    pub kind: BufferKind,
    pub path: String,
    pub rows: usize,
}

/// Summarizes a run. Artifact paths are relative to the output directory.
pub fn build_run_report(result: &RunResult) -> RunReport {
    RunReport {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        mode: result.mode,
        outcome: result.outcome,
        stats: result.stats,
        input_sets: result
            .input_sets
            .iter()
            .map(|set| InputSetSummary {
                name: set.name.clone(),
                side: set.source_set,
                email_column: set
                    .mapping
                    .as_ref()
                    .and_then(|mapping| mapping.email_column.clone()),
                stats: set.stats,
                error: set.error.clone(),
            })
            .collect(),
        comparison: result.comparison.as_ref().map(|comparison| ComparisonSummary {
            unique_to_a: comparison.unique_to_a.len(),
            unique_to_b: comparison.unique_to_b.len(),
            combined: comparison.combined.len(),
            overlap_count: comparison.overlap_count,
            overlap_samples: comparison.overlap_samples.clone(),
        }),
        artifacts: result
            .artifacts
            .iter()
            .map(|buffer| ArtifactSummary {
                kind: buffer.kind,
                path: buffer_path(Path::new(""), buffer).display().to_string(),
                rows: buffer.row_count(),
            })
            .collect(),
    }
}

/// Writes `run_report.json` into `output_dir`.
pub fn write_run_report(output_dir: &Path, result: &RunResult) -> Result<PathBuf> {
    let output_path = output_dir.join(REPORT_FILE_NAME);
    let io_error = |source| OutputError::Io {
        path: output_path.clone(),
        source,
    };
    std::fs::create_dir_all(output_dir).map_err(io_error)?;
    let json = serde_json::to_string_pretty(&build_run_report(result))?;
    std::fs::write(&output_path, format!("{json}\n")).map_err(io_error)?;
    Ok(output_path)
}
