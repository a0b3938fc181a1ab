//! Region-aware CSV dump splitting that never corrupts records.
//!
//! Reads the dump once, sequentially, grouping contiguous rows by the value
//! of the region column while capping every output file at a configurable
//! row count. Either trigger (new region value or full file) rotates the
//! buffer into a fresh, uniquely named file in the destination directory.
//! Uses the `csv` crate so embedded commas and newlines inside quoted
//! fields survive the split.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder, StringRecord};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::split::region_token::region_token;
use crate::split::writer::{OutputEncoding, RegionFileWriter};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Default cap on data rows per generated file.
pub const DEFAULT_ROWS_PER_FILE_LIMIT: u64 = 250_000;

/// Default zero-based index of the region column in the dump schema.
pub const DEFAULT_GROUP_COLUMN: usize = 1;

/// Zero-based index of the mobile-number column used by ids-only mode.
pub const MOBILE_COLUMN: usize = 2;

// ─────────────────────────────────────────────────────────────────────────────
// Public Types
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for a split run.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Maximum data rows (excluding any re-inserted header) per output file.
    pub rows_per_file_limit: u64,
    /// Zero-based index of the column whose value groups rows into files.
    pub group_column: usize,
    /// Project every output row (and the header) to the mobile column only.
    pub ids_only: bool,
    /// Prepend the captured header row to every output file.
    pub include_header: bool,
    /// Text encoding of the generated files.
    pub encoding: OutputEncoding,
    /// Filename-safe token function applied to region keys.
    pub token_fn: fn(&str) -> String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            rows_per_file_limit: DEFAULT_ROWS_PER_FILE_LIMIT,
            group_column: DEFAULT_GROUP_COLUMN,
            ids_only: false,
            include_header: false,
            encoding: OutputEncoding::Utf8,
            token_fn: region_token,
        }
    }
}

impl SplitConfig {
    /// Sets the per-file data row cap.
    pub fn rows_per_file_limit(mut self, limit: u64) -> Self {
        self.rows_per_file_limit = limit;
        self
    }

    /// Sets the grouping column index.
    pub fn group_column(mut self, column: usize) -> Self {
        self.group_column = column;
        self
    }

    /// Enables or disables the ids-only projection.
    pub fn ids_only(mut self, ids_only: bool) -> Self {
        self.ids_only = ids_only;
        self
    }

    /// Enables or disables header repetition.
    pub fn include_header(mut self, include_header: bool) -> Self {
        self.include_header = include_header;
        self
    }

    /// Sets the output encoding.
    pub fn encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Replaces the filename-safe token function.
    pub fn token_fn(mut self, token_fn: fn(&str) -> String) -> Self {
        self.token_fn = token_fn;
        self
    }
}

/// Result of splitting a dump file.
#[derive(Debug, Clone)]
pub struct SplitSummary {
    /// Paths to the generated files, in flush order.
    pub file_paths: Vec<PathBuf>,
    /// Total data rows processed (excluding headers).
    pub total_rows: u64,
    /// Number of data rows in each file (parallel to `file_paths`).
    pub rows_per_file: Vec<u64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Splits a CSV dump into per-region files.
///
/// Rows are grouped by contiguous runs of the configured region column and
/// additionally capped at `rows_per_file_limit` data rows per file. Every
/// flush creates a fresh `<region-token>_<uuid>.csv` in `dest_dir`; the
/// trailing buffer is always flushed, so even a header-only dump produces
/// one output file.
///
/// # Arguments
///
/// * `source` - Path to the source CSV dump (readability validated by the caller)
/// * `dest_dir` - Existing writable directory for the generated files
/// * `config` - Split configuration
///
/// # Returns
///
/// A `SplitSummary` with the generated paths in flush order and row counts.
///
/// # Errors
///
/// Returns `AppError::CsvRead` if the source cannot be read or has no
/// header row, `AppError::MalformedRow` if a row is missing required
/// fields, and `AppError::CsvWrite`/`AppError::Encoding` if a flush fails.
pub async fn split_file(
    source: &Path,
    dest_dir: &Path,
    config: SplitConfig,
) -> Result<SplitSummary, AppError> {
    // Clone paths for the blocking closure
    let source = source.to_owned();
    let dest_dir = dest_dir.to_owned();

    // Run the blocking CSV processing in a separate thread
    tokio::task::spawn_blocking(move || split_file_blocking(&source, &dest_dir, config))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Blocking implementation of the split run.
fn split_file_blocking(
    source: &Path,
    dest_dir: &Path,
    config: SplitConfig,
) -> Result<SplitSummary, AppError> {
    info!("[SPLITTER] Started splitting {}", source.display());

    #[cfg(debug_assertions)]
    tracing::debug!(
        rows_per_file_limit = config.rows_per_file_limit,
        group_column = config.group_column,
        ids_only = config.ids_only,
        include_header = config.include_header,
        "Split configuration"
    );

    let file = File::open(source)
        .map_err(|e| AppError::CsvRead(format!("Failed to open source file: {}", e)))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let header = capture_header(&mut reader, &config)?;
    let required = required_fields(&config);

    let mut file_paths: Vec<PathBuf> = Vec::new();
    let mut rows_per_file: Vec<u64> = Vec::new();
    let mut total_rows: u64 = 0;

    // Rotation state
    let mut buffer: Vec<StringRecord> = Vec::new();
    let mut previous_key: Option<String> = None;
    let mut counter: u64 = 0;
    // 1-based record ordinal; the header is record 1
    let mut record_ordinal: u64 = 1;

    for result in reader.records() {
        record_ordinal += 1;
        let record = result
            .map_err(|e| AppError::CsvRead(format!("Failed to read CSV record: {}", e)))?;

        if record.len() < required {
            return Err(AppError::MalformedRow {
                row: record_ordinal,
                expected: required,
                found: record.len(),
            });
        }

        let current_key = record[config.group_column].to_string();

        // The limit check runs before this row is appended, so a file holds
        // at most (and a full file exactly) the configured row count.
        let limit_reached = counter == config.rows_per_file_limit;
        let region_changed = previous_key
            .as_deref()
            .map_or(false, |previous| previous != current_key);

        if limit_reached || region_changed {
            info!(
                "[SPLITTER] Rotating to a new file: {}",
                if limit_reached {
                    "row-count limit reached"
                } else {
                    "new region encountered"
                }
            );
            let path = flush_buffer(
                dest_dir,
                previous_key.as_deref().unwrap_or_default(),
                &buffer,
                &config,
            )?;
            file_paths.push(path);
            rows_per_file.push(counter);
            buffer.clear();
            counter = 0;
        }

        if counter == 0 && config.include_header {
            buffer.push(header.clone());
        }

        let row = if config.ids_only {
            StringRecord::from(vec![record[MOBILE_COLUMN].to_string()])
        } else {
            record
        };
        buffer.push(row);
        counter += 1;
        total_rows += 1;
        previous_key = Some(current_key);
    }

    // The trailing buffer is always flushed; with zero data rows this still
    // writes exactly one (possibly header-only) file.
    info!("[SPLITTER] Flushing the final buffer");
    if config.include_header && buffer.is_empty() {
        buffer.push(header.clone());
    }
    let path = flush_buffer(
        dest_dir,
        previous_key.as_deref().unwrap_or_default(),
        &buffer,
        &config,
    )?;
    file_paths.push(path);
    rows_per_file.push(counter);

    info!(
        "[SPLITTER] Finished splitting {}: {} rows across {} files",
        source.display(),
        total_rows,
        file_paths.len()
    );

    Ok(SplitSummary {
        file_paths,
        total_rows,
        rows_per_file,
    })
}

/// Captures the header row, projected to the mobile column in ids-only mode.
fn capture_header(
    reader: &mut Reader<BufReader<File>>,
    config: &SplitConfig,
) -> Result<StringRecord, AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::CsvRead(format!("Failed to read CSV header: {}", e)))?;

    if headers.is_empty() {
        return Err(AppError::CsvRead("CSV file has no header row".to_string()));
    }

    if config.ids_only {
        if headers.len() <= MOBILE_COLUMN {
            return Err(AppError::MalformedRow {
                row: 1,
                expected: MOBILE_COLUMN + 1,
                found: headers.len(),
            });
        }
        Ok(StringRecord::from(vec![headers[MOBILE_COLUMN].to_string()]))
    } else {
        Ok(headers.clone())
    }
}

/// Minimum field count a data row must have for this configuration.
fn required_fields(config: &SplitConfig) -> usize {
    if config.ids_only {
        config.group_column.max(MOBILE_COLUMN) + 1
    } else {
        config.group_column + 1
    }
}

/// Writes the buffered rows to a fresh uniquely named region file.
fn flush_buffer(
    dest_dir: &Path,
    region_key: &str,
    buffer: &[StringRecord],
    config: &SplitConfig,
) -> Result<PathBuf, AppError> {
    let token = (config.token_fn)(region_key);
    let file_id = Uuid::new_v4();
    let path = dest_dir.join(format!("{}_{}.csv", token, file_id));

    let mut writer = RegionFileWriter::create(&path, config.encoding)?;
    for row in buffer {
        writer.write_record(row)?;
    }
    let path = writer.finish()?;

    info!(
        "[SPLITTER] Wrote file for region [{}] with id {}",
        token, file_id
    );
    Ok(path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
