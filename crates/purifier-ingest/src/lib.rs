pub mod csv_table;
pub mod discovery;
pub mod error;

pub use csv_table::{input_set_name, load_input_source, load_input_sources, read_input_set};
pub use discovery::{expand_inputs, list_csv_files};
pub use error::{IngestError, Result};
