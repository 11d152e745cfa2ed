//! Run options from the optional TOML file plus command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};

use purifier_model::{LabelStyle, PurifierOptions, ReconcileSchema};

use crate::cli::{LabelStyleArg, RunArgs, SchemaArg};

/// Reads options from `path`, or the defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<PurifierOptions> {
    let Some(path) = path else {
        return Ok(PurifierOptions::default());
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    PurifierOptions::from_toml_str(&source)
        .with_context(|| format!("parse config {}", path.display()))
}

/// Applies flags on top of file options. Switches only ever turn a feature on.
pub fn apply_overrides(
    options: &mut PurifierOptions,
    args: &RunArgs,
    schema: Option<SchemaArg>,
) {
    if args.chunked {
        options.batch.enabled = true;
    }
    if let Some(chunk_size) = args.chunk_size {
        options.chunk_size = chunk_size;
    }
    if let Some(style) = args.label_style {
        options.batch.label_style = match style {
            LabelStyleArg::Exact => LabelStyle::Exact,
            LabelStyleArg::Thousands => LabelStyle::Thousands,
        };
    }
    if args.export_rejected {
        options.export_rejected = true;
    }
    if let Some(schema) = schema {
        options.reconcile.schema = match schema {
            SchemaArg::Contact => ReconcileSchema::Contact,
            SchemaArg::Passthrough => ReconcileSchema::Passthrough,
        };
    }
}

/// Final options for a run, validated after overrides.
pub fn resolve_options(args: &RunArgs, schema: Option<SchemaArg>) -> Result<PurifierOptions> {
    let mut options = load_options(args.config.as_deref())?;
    apply_overrides(&mut options, args, schema);
    options.validate().context("invalid run options")?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = RunArgs {
            chunked: true,
            chunk_size: Some(100),
            label_style: Some(LabelStyleArg::Thousands),
            ..RunArgs::default()
        };
        let options = resolve_options(&args, Some(SchemaArg::Passthrough)).expect("options");
        assert!(options.batch.enabled);
        assert_eq!(options.chunk_size, 100);
        assert_eq!(options.batch.label_style, LabelStyle::Thousands);
        assert_eq!(options.reconcile.schema, ReconcileSchema::Passthrough);
        assert!(!options.export_rejected);
    }

    #[test]
    fn zero_chunk_size_flag_is_rejected() {
        let args = RunArgs {
            chunk_size: Some(0),
            ..RunArgs::default()
        };
        assert!(resolve_options(&args, None).is_err());
    }
}
