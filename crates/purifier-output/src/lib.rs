pub mod error;
pub mod report;
pub mod writer;

pub use error::{OutputError, Result};
pub use report::{REPORT_FILE_NAME, RunReport, build_run_report, write_run_report};
pub use writer::{buffer_path, buffer_to_csv, clear_archives, write_buffer, write_buffers};
