use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use purifier_core::{run_purify, run_reconcile};
use purifier_ingest::{expand_inputs, load_input_sources};
use purifier_model::{InputSetSource, RunResult};
use purifier_output::{write_buffers, write_run_report};

use crate::cli::{PurifyArgs, ReconcileArgs, RunArgs};
use crate::config::resolve_options;
use crate::types::CommandOutcome;

fn load_side(inputs: &[PathBuf], label: &str) -> Result<Vec<InputSetSource>> {
    let files = expand_inputs(inputs).with_context(|| format!("locate {label} inputs"))?;
    if files.is_empty() {
        bail!("no CSV files found for {label}");
    }
    info!(side = label, files = files.len(), "inputs located");
    Ok(load_input_sources(&files))
}

fn finish(result: RunResult, run: &RunArgs) -> Result<CommandOutcome> {
    let output_dir = run.output_dir.clone();
    if run.dry_run {
        info!(artifacts = result.artifacts.len(), "dry run, nothing written");
        return Ok(CommandOutcome {
            result,
            output_dir,
            written: Vec::new(),
            report: None,
            dry_run: true,
        });
    }
    let written = write_buffers(&output_dir, &result.artifacts)
        .with_context(|| format!("write outputs to {}", output_dir.display()))?;
    let report = write_run_report(&output_dir, &result).context("write run report")?;
    Ok(CommandOutcome {
        result,
        output_dir,
        written,
        report: Some(report),
        dry_run: false,
    })
}

pub fn run_purify_command(args: &PurifyArgs) -> Result<CommandOutcome> {
    let span = info_span!("purify", output_dir = %args.run.output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let options = resolve_options(&args.run, None)?;
    let sources = load_side(&args.files, "purify")?;
    let result = run_purify(sources, &options).context("purify run")?;
    let outcome = finish(result, &args.run)?;

    info!(
        written = outcome.written.len(),
        duration_ms = start.elapsed().as_millis(),
        "purify command complete"
    );
    Ok(outcome)
}

pub fn run_reconcile_command(args: &ReconcileArgs) -> Result<CommandOutcome> {
    let span = info_span!("reconcile", output_dir = %args.run.output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let options = resolve_options(&args.run, args.schema)?;
    let side_a = load_side(&args.a, "A")?;
    let side_b = load_side(&args.b, "B")?;
    let result = run_reconcile(side_a, side_b, &options).context("reconcile run")?;
    let outcome = finish(result, &args.run)?;

    info!(
        written = outcome.written.len(),
        duration_ms = start.elapsed().as_millis(),
        "reconcile command complete"
    );
    Ok(outcome)
}

/// Path of `path` relative to `base`, for display.
pub fn relative_display(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
