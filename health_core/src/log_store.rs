//! Append-only symptom log stored as CSV.
//!
//! Rows are only ever appended; nothing rewrites existing rows, so a failed
//! or interrupted append can at worst leave a partial final line, never lose
//! an earlier entry. Appends take an exclusive lock and reads a shared lock,
//! which keeps two concurrent runs from interleaving rows. Beyond that there
//! is no multi-process coordination.

use crate::types::*;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Column names, in file order
pub const LOG_HEADER: [&str; 4] = ["date", "symptoms", "severity", "remedies_suggested"];

/// A row in the CSV file
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    date: String,
    symptoms: String,
    severity: String,
    remedies_suggested: String,
}

impl From<&LogEntry> for CsvRow {
    fn from(entry: &LogEntry) -> Self {
        CsvRow {
            date: entry.formatted_timestamp(),
            symptoms: entry.symptom.clone(),
            severity: entry.severity.to_string(),
            remedies_suggested: entry.remedies_suggested.clone(),
        }
    }
}

impl TryFrom<CsvRow> for LogEntry {
    type Error = String;

    fn try_from(row: CsvRow) -> std::result::Result<Self, String> {
        let timestamp = NaiveDateTime::parse_from_str(row.date.trim(), TIMESTAMP_FORMAT)
            .map_err(|e| format!("invalid date '{}': {}", row.date, e))?;

        if row.symptoms.trim().is_empty() {
            return Err("empty symptom name".into());
        }

        let severity = Severity::parse(&row.severity)
            .map_err(|_| format!("invalid severity '{}'", row.severity))?;

        Ok(LogEntry {
            timestamp,
            symptom: row.symptoms.trim().to_string(),
            severity,
            remedies_suggested: row.remedies_suggested,
        })
    }
}

/// Handle on the persisted symptom log
#[derive(Clone, Debug)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_for_append(&self) -> Result<File> {
        std::fs::create_dir_all(crate::reference::parent_dir(&self.path))?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        Ok(file)
    }

    /// Create the log with its header row if it is missing or empty
    ///
    /// Returns `true` when the header was written.
    pub fn ensure_initialized(&self) -> Result<bool> {
        let file = self.open_for_append()?;
        file.lock_exclusive()?;

        let created = if file.metadata()?.len() == 0 {
            let mut writer = csv::Writer::from_writer(&file);
            writer.write_record(LOG_HEADER)?;
            writer.flush()?;
            drop(writer);
            file.sync_all()?;
            tracing::info!("Created empty symptom log at {:?}", self.path);
            true
        } else {
            false
        };

        file.unlock()?;
        Ok(created)
    }

    /// Append one entry to the end of the log
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        let mut file = self.open_for_append()?;

        // Acquire exclusive lock
        file.lock_exclusive()?;

        let len = file.metadata()?.len();
        let needs_headers = len == 0;

        // A hand-edited file may lack the final newline
        if !needs_headers && !ends_with_newline(&mut file, len)? {
            file.write_all(b"\n")?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_headers)
            .from_writer(&file);
        writer.serialize(CsvRow::from(entry))?;
        writer.flush()?;
        drop(writer);

        file.sync_all()?;
        file.unlock()?;

        tracing::debug!(
            "Appended {} (severity {}) to {:?}",
            entry.symptom,
            entry.severity,
            self.path
        );
        Ok(())
    }

    /// Read every entry in append order
    ///
    /// A missing, empty or header-only log yields an empty vector. Any
    /// malformed row fails the whole load.
    pub fn load_all(&self) -> Result<Vec<LogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        // Acquire shared lock for reading
        file.lock_shared()?;
        let result = self.read_entries(&file);
        file.unlock()?;

        let entries = result?;
        tracing::debug!("Read {} entries from {:?}", entries.len(), self.path);
        Ok(entries)
    }

    fn read_entries(&self, file: &File) -> Result<Vec<LogEntry>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| self.read_error(e))?
            .clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        if headers.iter().map(str::trim).ne(LOG_HEADER.iter().copied()) {
            return Err(Error::corrupt(
                &self.path,
                format!(
                    "unexpected header '{}', expected '{}'",
                    headers.iter().collect::<Vec<_>>().join(","),
                    LOG_HEADER.join(",")
                ),
            ));
        }

        let mut entries = Vec::new();
        for result in reader.deserialize::<CsvRow>() {
            let row = result.map_err(|e| self.read_error(e))?;
            let entry = LogEntry::try_from(row).map_err(|reason| {
                Error::corrupt(&self.path, format!("row {}: {}", entries.len() + 1, reason))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// I/O failures stay I/O errors; anything else means bad file contents
    fn read_error(&self, e: csv::Error) -> Error {
        if e.is_io_error() {
            Error::Csv(e)
        } else {
            Error::corrupt(&self.path, e)
        }
    }

    /// Number of entries currently in the log
    pub fn row_count(&self) -> Result<usize> {
        Ok(self.load_all()?.len())
    }
}

fn ends_with_newline(file: &mut File, len: u64) -> Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::default_reference_table;
    use chrono::NaiveDate;

    fn entry(symptom: &str, severity: &str, minute: u32) -> LogEntry {
        let table = default_reference_table();
        let at = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(8, minute, 0)
            .unwrap();
        LogEntry::new(
            at,
            symptom,
            table.get(symptom).unwrap(),
            Severity::parse(severity).unwrap(),
        )
    }

    #[test]
    fn test_initialize_writes_exact_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("health_log.csv");
        let store = LogStore::new(&path);

        assert!(store.ensure_initialized().unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "date,symptoms,severity,remedies_suggested\n"
        );

        // Second call is a no-op
        assert!(!store.ensure_initialized().unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "date,symptoms,severity,remedies_suggested\n"
        );
    }

    #[test]
    fn test_append_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(temp_dir.path().join("health_log.csv"));
        store.ensure_initialized().unwrap();

        let first = entry("fever", "2", 0);
        let second = entry("headache", "5", 1);
        store.append(&first).unwrap();
        store.append(&second).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded, vec![first, second]);
    }

    #[test]
    fn test_row_format_on_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("health_log.csv");
        let store = LogStore::new(&path);
        store.ensure_initialized().unwrap();
        store.append(&entry("cold", "3", 5)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "2024-01-15 08:05:00,cold,3,Rest; Drink warm fluids; Steam inhalation"
        );
    }

    #[test]
    fn test_append_without_initialize_writes_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("health_log.csv");
        let store = LogStore::new(&path);

        store.append(&entry("fever", "1", 0)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("date,symptoms,severity,remedies_suggested\n"));
        assert_eq!(store.row_count().unwrap(), 1);
    }

    #[test]
    fn test_append_repairs_missing_trailing_newline() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("health_log.csv");
        std::fs::write(
            &path,
            "date,symptoms,severity,remedies_suggested\n2024-01-01 10:00:00,cold,2,Rest",
        )
        .unwrap();

        let store = LogStore::new(&path);
        store.append(&entry("fever", "4", 0)).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].symptom, "cold");
        assert_eq!(loaded[1].symptom, "fever");
    }

    #[test]
    fn test_load_missing_or_empty_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();

        let missing = LogStore::new(temp_dir.path().join("missing.csv"));
        assert!(missing.load_all().unwrap().is_empty());

        let empty_path = temp_dir.path().join("empty.csv");
        std::fs::write(&empty_path, "").unwrap();
        assert!(LogStore::new(&empty_path).load_all().unwrap().is_empty());

        let header_only = LogStore::new(temp_dir.path().join("header.csv"));
        header_only.ensure_initialized().unwrap();
        assert!(header_only.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_rows_are_corrupt() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("health_log.csv");
        let store = LogStore::new(&path);

        let cases = [
            "date,symptoms,severity,remedies_suggested\nyesterday,cold,2,Rest\n",
            "date,symptoms,severity,remedies_suggested\n2024-01-01 10:00:00,cold,bad,Rest\n",
            "date,symptoms,severity,remedies_suggested\n2024-01-01 10:00:00,cold,9,Rest\n",
            "date,symptoms,severity,remedies_suggested\n2024-01-01 10:00:00,cold\n",
            "when,what\n2024-01-01 10:00:00,cold\n",
        ];

        for contents in cases {
            std::fs::write(&path, contents).unwrap();
            let err = store.load_all().unwrap_err();
            assert!(
                matches!(err, Error::StoreCorrupt { .. }),
                "{:?} gave {:?}",
                contents,
                err
            );
        }

        let mut bad_header = b"da\xffte,symptoms,severity,remedies_suggested\n".to_vec();
        bad_header.extend_from_slice(b"2024-01-01 10:00:00,cold,2,Rest\n");
        std::fs::write(&path, bad_header).unwrap();
        let err = store.load_all().unwrap_err();
        assert!(matches!(err, Error::StoreCorrupt { .. }), "{:?}", err);

        let mut bad_row = b"date,symptoms,severity,remedies_suggested\n".to_vec();
        bad_row.extend_from_slice(b"2024-01-01 10:00:00,c\xffld,2,Rest\n");
        std::fs::write(&path, bad_row).unwrap();
        let err = store.load_all().unwrap_err();
        assert!(matches!(err, Error::StoreCorrupt { .. }), "{:?}", err);
    }

    #[test]
    fn test_remedies_with_commas_are_quoted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(temp_dir.path().join("health_log.csv"));

        // "Rest in a quiet, dark room" contains a comma
        let headache = entry("headache", "3", 0);
        store.append(&headache).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded[0].remedies()[0], "Rest in a quiet, dark room");
    }
}
