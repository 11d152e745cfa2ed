pub mod comparison;
pub mod error;
pub mod options;
pub mod record;
pub mod run;
pub mod stats;

pub use comparison::{Batch, ComparisonResult, OverlapSample, ReconciledRecord};
pub use error::{PurifierError, Result, SetError};
pub use options::{
    BatchOptions, ColumnKeywords, DEFAULT_CHUNK_SIZE, DEFAULT_NAME_PLACEHOLDER,
    DEFAULT_OVERLAP_SAMPLE_LIMIT, LabelStyle, Mode, PurifierOptions, ReconcileOptions,
    ReconcileSchema,
};
pub use record::{
    ClassifiedRecord, ColumnMapping, InputSet, InputSetSource, NormalizedEmail, RawRow,
    RecordStatus, RejectReason, SourceSet,
};
pub use run::{
    BufferKind, CONTACT_COLUMNS, InputSetResult, OutputBuffer, PURIFIED_COLUMNS,
    REJECTED_COLUMNS, RunOutcome, RunResult,
};
pub use stats::RunStats;
