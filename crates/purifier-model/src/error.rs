use thiserror::Error;

/// Errors raised while configuring or starting a run.
///
/// Row-level and input-set-level problems are never surfaced through this
/// type; they are recorded as [`crate::RejectReason`] or [`SetError`] values.
#[derive(Debug, Error)]
pub enum PurifierError {
    #[error("invalid options: {message}")]
    InvalidOptions { message: String },

    #[error("typo domain {typo} maps to both {first} and {second}")]
    ConflictingCorrection {
        typo: String,
        first: String,
        second: String,
    },

    #[error("canonical domain {domain} is also listed as a typo")]
    CanonicalListedAsTypo { domain: String },

    #[error("failed to parse options: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PurifierError {
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PurifierError>;

/// Failure that removes a whole input set from processing.
///
/// None of these abort the run: the aggregator records the error against the
/// input set and moves on to the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SetError {
    #[error("no email column found among headers [{}]", .headers.join(", "))]
    MissingEmailColumn { headers: Vec<String> },

    #[error("input set has no rows")]
    EmptyInput,

    #[error("failed to parse input: {message}")]
    ParseFailure { message: String },
}
