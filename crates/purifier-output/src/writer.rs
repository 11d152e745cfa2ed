//! Output buffers to CSV files on disk.
//!
//! Chunk buffers land in a subdirectory named after their archive; every
//! other buffer is written directly into the output directory. An archive
//! directory holds the chunks of exactly one run: it is emptied before the
//! run's chunks are written.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, info_span};

use purifier_model::OutputBuffer;

use crate::error::{OutputError, Result};

/// Encodes a buffer as CSV text with a header row.
pub fn buffer_to_csv(buffer: &OutputBuffer) -> Result<String> {
    let encode_error = |source| OutputError::Encode {
        file_name: buffer.file_name.clone(),
        source,
    };
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&buffer.columns).map_err(encode_error)?;
    for row in &buffer.rows {
        writer.write_record(row).map_err(encode_error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|error| encode_error(csv::Error::from(error.into_error())))?;
    // Every cell is a Rust string, so the encoded bytes are UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Destination of `buffer` under `output_dir`.
pub fn buffer_path(output_dir: &Path, buffer: &OutputBuffer) -> PathBuf {
    match &buffer.archive {
        Some(archive) => output_dir.join(archive).join(&buffer.file_name),
        None => output_dir.join(&buffer.file_name),
    }
}

/// Writes one buffer, creating its directory if needed.
pub fn write_buffer(output_dir: &Path, buffer: &OutputBuffer) -> Result<PathBuf> {
    let path = buffer_path(output_dir, buffer);
    let io_error = |source| OutputError::Io {
        path: path.clone(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let contents = buffer_to_csv(buffer)?;
    std::fs::write(&path, contents).map_err(io_error)?;
    debug!(path = %path.display(), rows = buffer.row_count(), "buffer written");
    Ok(path)
}

/// Removes the archive directories `buffers` will write into, so no chunk
/// from an earlier run survives next to the new ones.
pub fn clear_archives(output_dir: &Path, buffers: &[OutputBuffer]) -> Result<()> {
    let archives: BTreeSet<&str> = buffers
        .iter()
        .filter_map(|buffer| buffer.archive.as_deref())
        .collect();
    for archive in archives {
        let path = output_dir.join(archive);
        if path.is_dir() {
            std::fs::remove_dir_all(&path).map_err(|source| OutputError::Io {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "stale archive cleared");
        }
    }
    Ok(())
}

/// Writes every buffer in order and returns the written paths.
pub fn write_buffers(output_dir: &Path, buffers: &[OutputBuffer]) -> Result<Vec<PathBuf>> {
    let span = info_span!("output", output_dir = %output_dir.display());
    let _guard = span.enter();
    clear_archives(output_dir, buffers)?;
    let mut written = Vec::with_capacity(buffers.len());
    for buffer in buffers {
        written.push(write_buffer(output_dir, buffer)?);
    }
    info!(files = written.len(), "outputs written");
    Ok(written)
}
