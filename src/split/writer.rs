//! Atomic writer for generated region files.
//!
//! Rows are serialized in memory first, encoded to the configured output
//! encoding, then written to a temporary file in the destination directory
//! and atomically persisted on `finish()`. If dropped before finishing, the
//! temporary file is automatically cleaned up and no output appears.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use csv::Writer;
use encoding_rs::WINDOWS_1251;
use tempfile::NamedTempFile;

use crate::error::AppError;

/// Text encoding of the generated files.
///
/// `Cp1251` reproduces the legacy variant of the tool that always wrote
/// windows-1251 for downstream consumers stuck on that code page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputEncoding {
    /// UTF-8, the modern default.
    #[default]
    Utf8,
    /// Windows-1251 for legacy downstream consumers.
    Cp1251,
}

/// An atomic writer for one region file.
///
/// The temporary file is created in the same directory as `final_path` so
/// that persisting is an atomic rename (same filesystem requirement). A
/// writer dropped without calling `finish()` deletes its temporary file.
pub struct RegionFileWriter {
    writer: Writer<Vec<u8>>,
    temp: NamedTempFile,
    final_path: PathBuf,
    encoding: OutputEncoding,
}

impl RegionFileWriter {
    /// Creates a new writer targeting the specified path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::CsvWrite` if the parent directory cannot be
    /// determined or the temporary file cannot be created.
    pub fn create(
        final_path: impl AsRef<Path>,
        encoding: OutputEncoding,
    ) -> Result<Self, AppError> {
        let final_path = final_path.as_ref().to_path_buf();

        let parent_dir = final_path.parent().ok_or_else(|| {
            AppError::CsvWrite(format!(
                "Cannot determine parent directory for: {}",
                final_path.display()
            ))
        })?;

        let temp = NamedTempFile::new_in(parent_dir).map_err(|e| {
            AppError::CsvWrite(format!("Failed to create temporary file: {}", e))
        })?;

        Ok(Self {
            writer: Writer::from_writer(Vec::new()),
            temp,
            final_path,
            encoding,
        })
    }

    /// Serializes one row into the in-memory buffer.
    pub fn write_record<I, T>(&mut self, record: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer
            .write_record(record)
            .map_err(|e| AppError::CsvWrite(format!("Failed to serialize record: {}", e)))
    }

    /// Encodes the buffered rows and atomically persists the file.
    ///
    /// Consumes the writer and returns the final path on success.
    ///
    /// # Errors
    ///
    /// Returns `AppError::CsvWrite` if flushing, writing or persisting
    /// fails, and `AppError::Encoding` if the content cannot be represented
    /// in the configured encoding. The temporary file is cleaned up on
    /// error.
    pub fn finish(self) -> Result<PathBuf, AppError> {
        let Self {
            writer,
            mut temp,
            final_path,
            encoding,
        } = self;

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::CsvWrite(format!("Failed to flush CSV writer: {}", e.error())))?;

        let encoded = encode_output(bytes, encoding)?;

        temp.write_all(&encoded)
            .map_err(|e| AppError::CsvWrite(format!("Failed to write temporary file: {}", e)))?;

        temp.persist(&final_path).map_err(|e| {
            AppError::CsvWrite(format!(
                "Failed to persist file to {}: {}",
                final_path.display(),
                e.error
            ))
        })?;

        Ok(final_path)
    }
}

/// Encodes serialized CSV bytes for the target encoding.
///
/// The serialized bytes are always valid UTF-8 (the csv writer only ever
/// receives UTF-8 fields), so the UTF-8 branch passes them through.
fn encode_output(bytes: Vec<u8>, encoding: OutputEncoding) -> Result<Vec<u8>, AppError> {
    match encoding {
        OutputEncoding::Utf8 => Ok(bytes),
        OutputEncoding::Cp1251 => {
            let text = std::str::from_utf8(&bytes)
                .map_err(|e| AppError::Encoding(format!("Serialized output is not UTF-8: {}", e)))?;

            let (encoded, _, had_unmappable) = WINDOWS_1251.encode(text);
            if had_unmappable {
                return Err(AppError::Encoding(
                    "Output contains characters not representable in windows-1251".to_string(),
                ));
            }
            Ok(encoded.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_persist() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let final_path = temp_dir.path().join("region.csv");

        let mut writer = RegionFileWriter::create(&final_path, OutputEncoding::Utf8)
            .expect("Failed to create writer");
        writer
            .write_record(["city", "region", "mobile"])
            .expect("Failed to write header");
        writer
            .write_record(["Pskov", "Pskovskaja", "5550001"])
            .expect("Failed to write record");

        let result_path = writer.finish().expect("Failed to finish");
        assert_eq!(result_path, final_path);

        let content = fs::read_to_string(&final_path).expect("Failed to read file");
        assert!(content.contains("city,region,mobile"));
        assert!(content.contains("Pskov,Pskovskaja,5550001"));
    }

    #[test]
    fn test_drop_cleanup() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let final_path = temp_dir.path().join("region.csv");

        {
            let mut writer = RegionFileWriter::create(&final_path, OutputEncoding::Utf8)
                .expect("Failed to create writer");
            writer
                .write_record(["abandoned"])
                .expect("Failed to write record");
            // Dropped here without finish()
        }

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .expect("Failed to read dir")
            .collect();
        assert!(
            entries.is_empty(),
            "Directory should be empty after drop (temp file cleaned up)"
        );
        assert!(!final_path.exists(), "Final file should not exist");
    }

    #[test]
    fn test_empty_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let final_path = temp_dir.path().join("empty.csv");

        let writer = RegionFileWriter::create(&final_path, OutputEncoding::Utf8)
            .expect("Failed to create writer");
        writer.finish().expect("Failed to finish");

        assert!(final_path.exists());
        let content = fs::read_to_string(&final_path).expect("Failed to read file");
        assert!(content.is_empty(), "File should be empty");
    }

    #[test]
    fn test_no_parent_directory() {
        #[cfg(unix)]
        {
            let result = RegionFileWriter::create("/", OutputEncoding::Utf8);
            assert!(result.is_err(), "Should fail for path with no parent");
        }
    }

    #[test]
    fn test_quoted_content_survives() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let final_path = temp_dir.path().join("quoted.csv");

        let mut writer = RegionFileWriter::create(&final_path, OutputEncoding::Utf8)
            .expect("Failed to create writer");
        writer
            .write_record(["city", "note"])
            .expect("Failed to write header");
        writer
            .write_record(["Tver", "Main St, Apt 4\nwith \"quotes\""])
            .expect("Failed to write record");
        writer.finish().expect("Failed to finish");

        let mut reader = csv::Reader::from_path(&final_path).expect("Failed to open reader");
        let records: Vec<Vec<String>> = reader
            .records()
            .map(|r| {
                r.expect("Failed to read record")
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0][1], "Main St, Apt 4\nwith \"quotes\"");
    }

    #[test]
    fn test_cp1251_output_decodes_back() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let final_path = temp_dir.path().join("legacy.csv");

        let mut writer = RegionFileWriter::create(&final_path, OutputEncoding::Cp1251)
            .expect("Failed to create writer");
        writer
            .write_record(["Москва", "Московская обл", "5550001"])
            .expect("Failed to write record");
        writer.finish().expect("Failed to finish");

        let bytes = fs::read(&final_path).expect("Failed to read file");
        // 'М' (U+041C) is a single 0xCC byte in windows-1251
        assert!(bytes.contains(&0xCC), "Expected windows-1251 bytes");

        let (decoded, _, had_errors) = WINDOWS_1251.decode(&bytes);
        assert!(!had_errors, "File should decode cleanly as windows-1251");
        assert!(decoded.contains("Москва"));
        assert!(decoded.contains("Московская обл"));
    }

    #[test]
    fn test_cp1251_unmappable_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let final_path = temp_dir.path().join("legacy.csv");

        let mut writer = RegionFileWriter::create(&final_path, OutputEncoding::Cp1251)
            .expect("Failed to create writer");
        writer
            .write_record(["Ω", "omega"])
            .expect("Failed to write record");

        let result = writer.finish();
        assert!(
            matches!(result, Err(AppError::Encoding(_))),
            "Greek letters are not representable in windows-1251"
        );
        assert!(!final_path.exists(), "No file should be persisted on error");
    }
}
