//! Core domain types for the Health Alert system.
//!
//! This module defines:
//! - Symptom reference data (remedies, severity class, advisory)
//! - The user-supplied severity rating
//! - Log entries as persisted in the symptom log

use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp layout used in the `date` column of the log
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Separator used when snapshotting a remedy list into a single log column
pub const REMEDY_SEPARATOR: &str = "; ";

// ============================================================================
// Reference Types
// ============================================================================

/// How serious a symptom generally is
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SeverityClass {
    Low,
    Medium,
    High,
}

/// Static reference information for one symptom
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SymptomReference {
    pub remedies: Vec<String>,
    pub severity: SeverityClass,
    pub seek_medical_attention: String,
}

impl SymptomReference {
    /// The remedy list flattened the way it is stored in the log
    pub fn remedies_joined(&self) -> String {
        self.remedies.join(REMEDY_SEPARATOR)
    }
}

// ============================================================================
// Severity Rating
// ============================================================================

/// Self-reported severity, always within 1..=5
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Severity(u8);

impl Severity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Ratings at or above this trigger the medical-attention advisory
    pub const ELEVATED: u8 = 4;

    /// Parse user or file input into a rating
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let value: u8 = trimmed
            .parse()
            .map_err(|_| Error::InvalidSeverity(trimmed.to_string()))?;
        Self::try_from(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_elevated(self) -> bool {
        self.0 >= Self::ELEVATED
    }
}

impl TryFrom<u8> for Severity {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Severity(value))
        } else {
            Err(Error::InvalidSeverity(value.to_string()))
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Log Entry
// ============================================================================

/// One recorded symptom event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub symptom: String,
    pub severity: Severity,
    /// Remedy list at the time of logging, joined with `"; "`
    pub remedies_suggested: String,
}

impl LogEntry {
    /// Build an entry, snapshotting the reference's current remedies
    pub fn new(
        timestamp: NaiveDateTime,
        symptom: impl Into<String>,
        reference: &SymptomReference,
        severity: Severity,
    ) -> Self {
        Self {
            timestamp: truncate_to_seconds(timestamp),
            symptom: symptom.into(),
            severity,
            remedies_suggested: reference.remedies_joined(),
        }
    }

    /// Timestamp rendered as stored in the log
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// The remedy snapshot split back into its items
    pub fn remedies(&self) -> Vec<&str> {
        if self.remedies_suggested.is_empty() {
            return Vec::new();
        }
        self.remedies_suggested.split(REMEDY_SEPARATOR).collect()
    }
}

/// The log only has second resolution; drop sub-second precision up front so
/// an entry compares equal to itself after a reload.
fn truncate_to_seconds(ts: NaiveDateTime) -> NaiveDateTime {
    use chrono::Timelike;
    ts.with_nanosecond(0).unwrap_or(ts)
}
