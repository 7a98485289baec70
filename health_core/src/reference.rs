//! Symptom reference store.
//!
//! The reference document is a JSON object mapping symptom name to its
//! remedies, severity class and medical-attention advisory. Key order in the
//! document is the menu order, so the table keeps entries in a `Vec` rather
//! than a hash map.

use crate::types::*;
use crate::{Error, Result};
use fs2::FileExt;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Cached default table - built once and reused
static DEFAULT_REFERENCE: Lazy<ReferenceTable> = Lazy::new(build_default_reference);

/// Get a reference to the built-in symptom table written on first run
pub fn default_reference_table() -> &'static ReferenceTable {
    &DEFAULT_REFERENCE
}

fn build_default_reference() -> ReferenceTable {
    let mut table = ReferenceTable::default();

    table.push(
        "fever",
        SymptomReference {
            remedies: vec![
                "Rest well".into(),
                "Stay hydrated".into(),
                "Take paracetamol if temperature is high".into(),
            ],
            severity: SeverityClass::Medium,
            seek_medical_attention:
                "If temperature exceeds 102°F or persists for more than 3 days".into(),
        },
    );

    table.push(
        "headache",
        SymptomReference {
            remedies: vec![
                "Rest in a quiet, dark room".into(),
                "Stay hydrated".into(),
                "Try mild pain relievers".into(),
            ],
            severity: SeverityClass::Low,
            seek_medical_attention: "If severe and persistent for more than 24 hours".into(),
        },
    );

    table.push(
        "cold",
        SymptomReference {
            remedies: vec![
                "Rest".into(),
                "Drink warm fluids".into(),
                "Steam inhalation".into(),
            ],
            severity: SeverityClass::Low,
            seek_medical_attention: "If symptoms worsen after 7 days".into(),
        },
    );

    table.push(
        "stomach_ache",
        SymptomReference {
            remedies: vec![
                "Avoid heavy foods".into(),
                "Try ginger tea".into(),
                "Stay hydrated".into(),
            ],
            severity: SeverityClass::Medium,
            seek_medical_attention: "If severe pain or accompanied by vomiting".into(),
        },
    );

    table
}

// ============================================================================
// Reference Table
// ============================================================================

/// Ordered, immutable-after-load mapping of symptom name to reference data
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    entries: Vec<(String, SymptomReference)>,
}

impl ReferenceTable {
    /// Insert or replace, keeping the first-insertion position
    fn push(&mut self, name: impl Into<String>, reference: SymptomReference) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = reference,
            None => self.entries.push((name, reference)),
        }
    }

    /// Symptom names in document order, for menu display
    pub fn list_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&SymptomReference> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, reference)| reference)
    }

    /// Resolve a 1-based menu selection
    pub fn by_index(&self, one_based: usize) -> Result<(&str, &SymptomReference)> {
        one_based
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|(name, reference)| (name.as_str(), reference))
            .ok_or_else(|| {
                Error::InvalidSelection(format!(
                    "{} is not between 1 and {}",
                    one_based,
                    self.entries.len()
                ))
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as the persisted JSON document (4-space indent, order kept)
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut map = Map::new();
        for (name, reference) in &self.entries {
            map.insert(name.clone(), serde_json::to_value(reference)?);
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        map.serialize(&mut ser)?;

        String::from_utf8(buf).map_err(|e| Error::Other(e.to_string()))
    }

    /// Parse the persisted JSON document
    ///
    /// `path` is only used to label errors.
    pub fn from_json(contents: &str, path: &Path) -> Result<Self> {
        let value: Value =
            serde_json::from_str(contents).map_err(|e| Error::corrupt(path, e))?;

        let Value::Object(map) = value else {
            return Err(Error::corrupt(path, "expected a JSON object of symptoms"));
        };

        let mut table = ReferenceTable::default();
        for (name, raw) in map {
            if name.trim().is_empty() {
                return Err(Error::corrupt(path, "symptom with an empty name"));
            }
            let reference: SymptomReference = serde_json::from_value(raw)
                .map_err(|e| Error::corrupt(path, format!("symptom '{}': {}", name, e)))?;
            table.push(name, reference);
        }

        if table.is_empty() {
            return Err(Error::corrupt(path, "no symptoms defined"));
        }

        Ok(table)
    }
}

// ============================================================================
// Reference Store
// ============================================================================

/// Handle on the persisted reference document
#[derive(Clone, Debug)]
pub struct ReferenceStore {
    path: PathBuf,
}

impl ReferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the default table if no reference document exists yet
    ///
    /// Returns `true` when the defaults were written. An existing file is never
    /// touched, whatever its contents.
    pub fn ensure_initialized(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        let dir = parent_dir(&self.path);
        std::fs::create_dir_all(&dir)?;

        let contents = default_reference_table().to_json_pretty()?;

        let temp = NamedTempFile::new_in(&dir)?;
        temp.as_file().lock_exclusive()?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Refuse to clobber a file another run created in the meantime
        match temp.persist_noclobber(&self.path) {
            Ok(_) => {
                tracing::info!("Wrote default symptom reference to {:?}", self.path);
                Ok(true)
            }
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(Error::Io(e.error)),
        }
    }

    /// Load the full ordered table
    pub fn load(&self) -> Result<ReferenceTable> {
        let bytes = std::fs::read(&self.path)?;
        let contents = String::from_utf8(bytes).map_err(|e| Error::corrupt(&self.path, e))?;
        let table = ReferenceTable::from_json(&contents, &self.path)?;
        tracing::debug!(
            "Loaded {} symptom references from {:?}",
            table.len(),
            self.path
        );
        Ok(table)
    }
}

/// Directory a store file lives in; `.` for bare file names
pub(crate) fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_order_and_contents() {
        let table = default_reference_table();
        assert_eq!(
            table.list_names(),
            vec!["fever", "headache", "cold", "stomach_ache"]
        );

        let fever = table.get("fever").unwrap();
        assert_eq!(fever.severity, SeverityClass::Medium);
        assert_eq!(
            fever.seek_medical_attention,
            "If temperature exceeds 102°F or persists for more than 3 days"
        );
        assert_eq!(table.get("headache").unwrap().severity, SeverityClass::Low);
        assert_eq!(table.get("cold").unwrap().severity, SeverityClass::Low);
        assert_eq!(
            table.get("stomach_ache").unwrap().severity,
            SeverityClass::Medium
        );
    }

    #[test]
    fn test_bootstrap_writes_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = ReferenceStore::new(temp_dir.path().join("symptoms_db.json"));

        assert!(store.ensure_initialized().unwrap());
        let table = store.load().unwrap();
        assert_eq!(&table, default_reference_table());
    }

    #[test]
    fn test_bootstrap_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("symptoms_db.json");
        let store = ReferenceStore::new(&path);

        store.ensure_initialized().unwrap();
        let first = std::fs::read_to_string(&path).unwrap();

        assert!(!store.ensure_initialized().unwrap());
        let second = std::fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.load().unwrap().len(), 4);

        // No stray temp files next to the document
        let files: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_bootstrap_leaves_custom_file_alone() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("symptoms_db.json");
        let custom = r#"{"rash": {"remedies": ["Keep dry"], "severity": "low", "seek_medical_attention": "If it spreads"}}"#;
        std::fs::write(&path, custom).unwrap();

        let store = ReferenceStore::new(&path);
        assert!(!store.ensure_initialized().unwrap());
        assert_eq!(store.load().unwrap().list_names(), vec!["rash"]);
    }

    #[test]
    fn test_document_order_is_menu_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("symptoms_db.json");
        let doc = r#"{
            "zebra_itch": {"remedies": [], "severity": "low", "seek_medical_attention": "never"},
            "allergy": {"remedies": ["Antihistamine"], "severity": "high", "seek_medical_attention": "If breathing is hard"},
            "migraine": {"remedies": ["Dark room"], "severity": "medium", "seek_medical_attention": "If vision changes"}
        }"#;
        std::fs::write(&path, doc).unwrap();

        let table = ReferenceStore::new(&path).load().unwrap();
        assert_eq!(table.list_names(), vec!["zebra_itch", "allergy", "migraine"]);
        assert_eq!(table.by_index(2).unwrap().0, "allergy");
    }

    #[test]
    fn test_by_index_bounds() {
        let table = default_reference_table();
        assert_eq!(table.by_index(1).unwrap().0, "fever");
        assert_eq!(table.by_index(4).unwrap().0, "stomach_ache");
        assert!(matches!(table.by_index(0), Err(Error::InvalidSelection(_))));
        assert!(matches!(table.by_index(99), Err(Error::InvalidSelection(_))));
    }

    #[test]
    fn test_corrupt_documents_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("symptoms_db.json");
        let store = ReferenceStore::new(&path);

        let cases = [
            "{ not json",
            "[1, 2, 3]",
            "{}",
            r#"{"fever": {"remedies": "rest", "severity": "medium", "seek_medical_attention": "x"}}"#,
            r#"{"fever": {"remedies": [], "severity": "extreme", "seek_medical_attention": "x"}}"#,
            r#"{"fever": {"remedies": []}}"#,
        ];

        for doc in cases {
            std::fs::write(&path, doc).unwrap();
            let err = store.load().unwrap_err();
            assert!(
                matches!(err, Error::StoreCorrupt { .. }),
                "{} gave {:?}",
                doc,
                err
            );
        }

        // Bytes that are not UTF-8 at all
        std::fs::write(&path, [0xff, 0xfe, b'{', b'}']).unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::StoreCorrupt { .. }), "{:?}", err);
    }

    #[test]
    fn test_missing_document_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = ReferenceStore::new(temp_dir.path().join("absent.json"));
        assert!(matches!(store.load(), Err(Error::Io(_))));
    }

    #[test]
    fn test_written_document_uses_four_space_indent() {
        let json = default_reference_table().to_json_pretty().unwrap();
        assert!(json.starts_with("{\n    \"fever\": {\n        \"remedies\": ["));
    }

    #[test]
    fn test_parent_dir_of_bare_name() {
        assert_eq!(parent_dir(Path::new("symptoms_db.json")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("data/x.json")), PathBuf::from("data"));
    }
}
