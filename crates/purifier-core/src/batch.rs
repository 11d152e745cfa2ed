//! Fixed-size, order-preserving partitioning with chunk labels.

use purifier_model::{Batch, LabelStyle, PurifierError, Result};

/// Splits `records` into chunks of `chunk_size`.
///
/// Chunk `i` covers offsets `[i * chunk_size, i * chunk_size + len)`; all
/// chunks but the last hold exactly `chunk_size` records. An empty input
/// yields no chunks.
pub fn partition<T: Clone>(
    records: &[T],
    chunk_size: usize,
    style: LabelStyle,
) -> Result<Vec<Batch<T>>> {
    if chunk_size == 0 {
        return Err(PurifierError::invalid_options("chunk size must be at least 1"));
    }
    Ok(records
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, chunk)| {
            let start = index * chunk_size;
            let end = start + chunk.len();
            Batch {
                index,
                start,
                end,
                label: chunk_label(index, start, end, chunk_size, style),
                records: chunk.to_vec(),
            }
        })
        .collect())
}

/// Human label for the chunk at `index` covering `[start, end)`.
pub fn chunk_label(
    index: usize,
    start: usize,
    end: usize,
    chunk_size: usize,
    style: LabelStyle,
) -> String {
    match style {
        LabelStyle::Exact => format!("{}-{}", start + 1, end),
        LabelStyle::Thousands => {
            // Rounded to steps of chunk_size + 1, so 4999-record chunks read 1-5K, 5K-10K.
            let step = chunk_size + 1;
            let from = if index == 0 {
                "1".to_string()
            } else {
                format_thousands(index * step)
            };
            format!("{from}-{}", format_thousands((index + 1) * step))
        }
    }
}

/// `12000` becomes `12K`, `2500` becomes `2.5K`, `1010` becomes `1.01K`;
/// values under 1000 stay as is. The thousands are printed exactly so that
/// distinct values never share a label.
pub fn format_thousands(value: usize) -> String {
    if value < 1000 {
        return value.to_string();
    }
    let whole = value / 1000;
    let fraction = value % 1000;
    if fraction == 0 {
        return format!("{whole}K");
    }
    let digits = format!("{fraction:03}");
    format!("{whole}.{}K", digits.trim_end_matches('0'))
}

/// File name for one chunk, such as `SDP-1-4999 Data Import.csv`.
pub fn chunk_file_name(prefix: &str, label: &str) -> String {
    format!("{prefix}-{label} Data Import.csv")
}
