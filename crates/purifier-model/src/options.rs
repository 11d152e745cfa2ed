//! Configuration options for purify and reconcile runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PurifierError, Result};

/// Default number of records per exported chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 4999;

/// Default number of overlapping keys kept for audit logging.
pub const DEFAULT_OVERLAP_SAMPLE_LIMIT: usize = 100;

/// Name used when no first or last name can be derived.
pub const DEFAULT_NAME_PLACEHOLDER: &str = "Applicant";

/// Which pipeline a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Clean one or more input sets, merging them when there are several.
    #[default]
    Purify,
    /// Compare two sides and keep the records exclusive to either one.
    Reconcile,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Purify => "purify",
            Self::Reconcile => "reconcile",
        }
    }
}

/// Header keywords used to detect the email, phone, and name columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnKeywords {
    pub email: Vec<String>,
    pub phone: Vec<String>,
    pub name: Vec<String>,
}

impl Default for ColumnKeywords {
    fn default() -> Self {
        Self {
            email: to_strings(&["email", "e-mail", "mail"]),
            phone: to_strings(&["phone", "mobile", "cell", "tel"]),
            name: to_strings(&["name", "first", "full"]),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

/// How chunk labels are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    /// 1-based inclusive offsets, e.g. `5000-9998`.
    #[default]
    Exact,
    /// Rounded thousands, e.g. `5K-10K`.
    Thousands,
}

/// Options for chunked export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchOptions {
    /// Emit chunk buffers in addition to the full outputs.
    pub enabled: bool,
    pub label_style: LabelStyle,
    pub file_prefix: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            label_style: LabelStyle::default(),
            file_prefix: "SDP".to_string(),
        }
    }
}

/// Column layout for reconciled exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileSchema {
    /// `First Name, Last Name, Email`.
    #[default]
    Contact,
    /// The input row unchanged, over the union of input headers.
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileOptions {
    pub schema: ReconcileSchema,
    pub name_placeholder: String,
    pub overlap_sample_limit: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            schema: ReconcileSchema::default(),
            name_placeholder: DEFAULT_NAME_PLACEHOLDER.to_string(),
            overlap_sample_limit: DEFAULT_OVERLAP_SAMPLE_LIMIT,
        }
    }
}

/// Options controlling a purify or reconcile run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PurifierOptions {
    /// Pipeline the options are written for. When set, a run of the other
    /// mode is refused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    pub chunk_size: usize,
    pub batch: BatchOptions,
    /// Also export invalid and duplicate rows with their status.
    pub export_rejected: bool,
    pub columns: ColumnKeywords,
    /// Extra typo corrections merged over the built-in table.
    ///
    /// Key: canonical domain. Value: misspellings that map to it.
    pub corrections: BTreeMap<String, Vec<String>>,
    pub reconcile: ReconcileOptions,
}

impl Default for PurifierOptions {
    fn default() -> Self {
        Self {
            mode: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            batch: BatchOptions::default(),
            export_rejected: false,
            columns: ColumnKeywords::default(),
            corrections: BTreeMap::new(),
            reconcile: ReconcileOptions::default(),
        }
    }
}

impl PurifierOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let options: Self = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn with_batching(mut self, enabled: bool) -> Self {
        self.batch.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_export_rejected(mut self, enabled: bool) -> Self {
        self.export_rejected = enabled;
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: ReconcileSchema) -> Self {
        self.reconcile.schema = schema;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(PurifierError::invalid_options("chunk_size must be at least 1"));
        }
        for (label, keywords) in [
            ("email", &self.columns.email),
            ("phone", &self.columns.phone),
            ("name", &self.columns.name),
        ] {
            if keywords.iter().all(|keyword| keyword.trim().is_empty()) {
                return Err(PurifierError::invalid_options(format!(
                    "columns.{label} needs at least one keyword"
                )));
            }
        }
        if self.reconcile.name_placeholder.trim().is_empty() {
            return Err(PurifierError::invalid_options(
                "reconcile.name_placeholder must not be empty",
            ));
        }
        Ok(())
    }

    /// Fails when the options name a mode other than `mode`.
    pub fn check_mode(&self, mode: Mode) -> Result<()> {
        match self.mode {
            Some(configured) if configured != mode => Err(PurifierError::invalid_options(format!(
                "options are for {} mode but the run is {}",
                configured.as_str(),
                mode.as_str()
            ))),
            _ => Ok(()),
        }
    }
}
