//! Intermediate file store
//!
//! Extraction writes the projected source rows to a delimiter-separated text
//! file; staging reads them back. The file has no header and columns are
//! positional. NULL is written as an empty field and an empty field reads back
//! as NULL.

use crate::config::IntermediateConfig;
use crate::domain::{PipelineError, RawRecord, Result, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Positional text file holding one extraction
#[derive(Debug, Clone)]
pub struct IntermediateStore {
    path: PathBuf,
    delimiter: u8,
}

impl IntermediateStore {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self {
            path: path.into(),
            delimiter,
        }
    }

    /// Build the store from the `[intermediate]` section
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] if the delimiter is not a single
    /// ASCII character.
    pub fn from_config(config: &IntermediateConfig) -> Result<Self> {
        let delimiter = config.delimiter_byte().ok_or_else(|| {
            PipelineError::Configuration(format!(
                "intermediate.delimiter must be a single ASCII character, got '{}'",
                config.delimiter
            ))
        })?;
        Ok(Self::new(config.path(), delimiter))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Truncate the file and write every record, creating the folder if needed
    ///
    /// The write is not atomic: a failure part way through leaves a partial file.
    pub fn write(&self, records: &[RawRecord]) -> Result<usize> {
        if let Some(folder) = self.path.parent() {
            if !folder.as_os_str().is_empty() {
                fs::create_dir_all(folder).map_err(|e| {
                    PipelineError::IntermediateStore(format!(
                        "Failed to create folder {}: {e}",
                        folder.display()
                    ))
                })?;
            }
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .from_path(&self.path)?;

        for record in records {
            writer.write_record(record.values().iter().map(|v| v.as_deref().unwrap_or("")))?;
        }
        writer.flush()?;

        tracing::debug!(
            path = %self.path.display(),
            rows = records.len(),
            "Wrote intermediate file"
        );

        Ok(records.len())
    }

    /// Read every record, each aligned to `width` positions
    ///
    /// Short lines are padded with NULL and extra fields are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingIntermediateData`] if the file does not exist.
    pub fn read(&self, width: usize) -> Result<Vec<RawRecord>> {
        if !self.exists() {
            return Err(PipelineError::MissingIntermediateData {
                path: self.path.clone(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let values: Vec<Value> = (0..width)
                .map(|i| match row.get(i) {
                    Some("") | None => None,
                    Some(text) => Some(text.to_string()),
                })
                .collect();
            records.push(RawRecord::new(values));
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(values: &[Option<&str>]) -> RawRecord {
        RawRecord::new(values.iter().map(|v| v.map(str::to_string)).collect())
    }

    #[test]
    fn test_write_creates_folder_and_reads_back() {
        let dir = TempDir::new().unwrap();
        let store = IntermediateStore::new(dir.path().join("data/raw_data.csv"), b';');

        let rows = vec![
            RawRecord::from_text(["1", "a"]),
            RawRecord::from_text(["2", "b"]),
        ];
        assert_eq!(store.write(&rows).unwrap(), 2);
        assert_eq!(store.read(2).unwrap(), rows);
    }

    #[test]
    fn test_file_has_no_header_and_uses_delimiter() {
        let dir = TempDir::new().unwrap();
        let store = IntermediateStore::new(dir.path().join("raw_data.csv"), b';');
        store
            .write(&[RawRecord::from_text(["1", "shipped"])])
            .unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "1;shipped\n");
    }

    #[test]
    fn test_null_round_trips_as_empty_field() {
        let dir = TempDir::new().unwrap();
        let store = IntermediateStore::new(dir.path().join("raw_data.csv"), b';');
        let rows = vec![record(&[Some("1"), None, Some("x")])];

        store.write(&rows).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "1;;x\n");
        assert_eq!(store.read(3).unwrap(), rows);
    }

    #[test]
    fn test_values_containing_delimiter_are_quoted() {
        let dir = TempDir::new().unwrap();
        let store = IntermediateStore::new(dir.path().join("raw_data.csv"), b';');
        let rows = vec![RawRecord::from_text(["1", "a;b", "line\nbreak"])];

        store.write(&rows).unwrap();
        assert_eq!(store.read(3).unwrap(), rows);
    }

    #[test]
    fn test_write_truncates_previous_content() {
        let dir = TempDir::new().unwrap();
        let store = IntermediateStore::new(dir.path().join("raw_data.csv"), b';');
        store
            .write(&[
                RawRecord::from_text(["1"]),
                RawRecord::from_text(["2"]),
            ])
            .unwrap();
        store.write(&[RawRecord::from_text(["3"])]).unwrap();

        assert_eq!(store.read(1).unwrap(), vec![RawRecord::from_text(["3"])]);
    }

    #[test]
    fn test_read_pads_short_lines_and_drops_extra_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("raw_data.csv");
        fs::write(&path, "1\n2;b;c;extra\n").unwrap();
        let store = IntermediateStore::new(&path, b';');

        let rows = store.read(3).unwrap();
        assert_eq!(rows[0], record(&[Some("1"), None, None]));
        assert_eq!(rows[1], record(&[Some("2"), Some("b"), Some("c")]));
    }

    #[test]
    fn test_read_empty_file_yields_no_records() {
        let dir = TempDir::new().unwrap();
        let store = IntermediateStore::new(dir.path().join("raw_data.csv"), b';');
        store.write(&[]).unwrap();

        assert!(store.read(2).unwrap().is_empty());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = IntermediateStore::new(dir.path().join("absent.csv"), b';');

        let err = store.read(2).unwrap_err();
        assert!(matches!(err, PipelineError::MissingIntermediateData { .. }));
        assert!(err.to_string().contains("re-run extraction"));
    }

    #[test]
    fn test_from_config_rejects_multi_char_delimiter() {
        let config = IntermediateConfig {
            folder: PathBuf::from("data"),
            file_name: "raw_data.csv".to_string(),
            delimiter: ";;".to_string(),
        };
        assert!(IntermediateStore::from_config(&config).is_err());
    }
}
