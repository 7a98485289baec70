//! The tracker context: both store handles plus the loaded reference table.
//!
//! Every interactive operation goes through a `Tracker`, so the lifetime of
//! the reference data (loaded once at open, never mutated) is explicit.

use crate::config::DataConfig;
use crate::insights::{summarize, InsightReport};
use crate::log_store::LogStore;
use crate::reference::{ReferenceStore, ReferenceTable};
use crate::types::*;
use crate::{Error, Result};
use chrono::{Local, NaiveDateTime};

/// Outcome of logging one symptom
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggedSymptom {
    pub entry: LogEntry,
    /// Set when the severity is high enough to warrant the advisory
    pub advisory: Option<String>,
}

#[derive(Debug)]
pub struct Tracker {
    references: ReferenceTable,
    log: LogStore,
}

impl Tracker {
    /// Bootstrap any missing store, then load the reference table
    ///
    /// Fails with `Error::StoreCorrupt` when the reference document exists but
    /// is malformed; the file is left for the user to repair.
    pub fn open(data: &DataConfig) -> Result<Self> {
        Self::from_stores(
            ReferenceStore::new(data.reference_path()),
            LogStore::new(data.log_path()),
        )
    }

    pub fn from_stores(reference_store: ReferenceStore, log: LogStore) -> Result<Self> {
        reference_store.ensure_initialized()?;
        log.ensure_initialized()?;

        let references = reference_store.load()?;
        tracing::info!(
            "Tracker ready: {} symptoms from {:?}, log at {:?}",
            references.len(),
            reference_store.path(),
            log.path()
        );

        Ok(Self { references, log })
    }

    pub fn references(&self) -> &ReferenceTable {
        &self.references
    }

    pub fn log_store(&self) -> &LogStore {
        &self.log
    }

    /// Resolve raw menu input (1-based) to a symptom
    pub fn select_symptom(&self, input: &str) -> Result<(&str, &SymptomReference)> {
        let trimmed = input.trim();
        let index: usize = trimmed
            .parse()
            .map_err(|_| Error::InvalidSelection(format!("'{}' is not a number", trimmed)))?;
        self.references.by_index(index)
    }

    /// Record a symptom now
    pub fn log_symptom(&self, symptom: &str, severity: Severity) -> Result<LoggedSymptom> {
        self.log_symptom_at(symptom, severity, Local::now().naive_local())
    }

    /// Record a symptom at a given local time
    pub fn log_symptom_at(
        &self,
        symptom: &str,
        severity: Severity,
        at: NaiveDateTime,
    ) -> Result<LoggedSymptom> {
        let reference = self.references.get(symptom).ok_or_else(|| {
            Error::InvalidSelection(format!("unknown symptom '{}'", symptom))
        })?;

        let entry = LogEntry::new(at, symptom, reference, severity);
        self.log.append(&entry)?;
        tracing::info!("Logged {} at severity {}", symptom, severity);

        let advisory = severity
            .is_elevated()
            .then(|| reference.seek_medical_attention.clone());

        Ok(LoggedSymptom { entry, advisory })
    }

    /// The full log in append order
    pub fn history(&self) -> Result<Vec<LogEntry>> {
        let entries = self.log.load_all()?;
        for entry in &entries {
            if !self.references.contains(&entry.symptom) {
                tracing::warn!(
                    "Log entry from {} refers to unknown symptom '{}'",
                    entry.formatted_timestamp(),
                    entry.symptom
                );
            }
        }
        Ok(entries)
    }

    /// Frequency and mean-severity insights over the full log
    pub fn insights(&self) -> Result<InsightReport> {
        Ok(summarize(&self.history()?))
    }
}
