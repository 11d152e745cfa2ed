pub mod batch;
pub mod classify;
pub mod columns;
pub mod contact;
pub mod corrections;
pub mod email;
pub mod export;
pub mod reconcile;
pub mod redact;
pub mod run;
pub mod session;

pub use batch::{chunk_file_name, chunk_label, format_thousands, partition};
pub use classify::{RowContext, classify_input_set, classify_row, clean_phone};
pub use columns::detect_columns;
pub use contact::{ContactName, contact_name};
pub use corrections::{DomainCorrections, DomainCorrectionsBuilder};
pub use email::{EmailNormalizer, is_structurally_valid};
pub use export::{
    MERGED_FILE_NAME, PURIFIED_ARCHIVE, REJECTED_FILE_NAME, chunk_buffers, cleaned_file_name,
    purified_buffer, reconciled_buffer, rejected_buffer, unique_file_name,
};
pub use reconcile::{SideEntry, SideRecords, export_columns, reconcile};
pub use redact::{REDACTED_VALUE, log_data_enabled, redact_value, set_log_data_enabled};
pub use run::{run_purify, run_reconcile};
pub use session::ReconciliationSession;
