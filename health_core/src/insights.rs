//! Aggregate insights over a loaded symptom log.
//!
//! Pure functions: no I/O, total over any input including an empty slice.

use crate::LogEntry;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// How many times a symptom was logged
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymptomFrequency {
    pub symptom: String,
    pub count: usize,
}

/// Mean severity for one symptom
#[derive(Clone, Debug, PartialEq)]
pub struct SeverityAverage {
    pub symptom: String,
    pub mean: f64,
}

impl fmt::Display for SeverityAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.mean)
    }
}

/// Both aggregates plus the number of entries they were computed from
#[derive(Clone, Debug, PartialEq, Default)]
pub struct InsightReport {
    pub total_entries: usize,
    pub frequencies: Vec<SymptomFrequency>,
    pub averages: Vec<SeverityAverage>,
}

impl InsightReport {
    pub fn is_empty(&self) -> bool {
        self.total_entries == 0
    }
}

/// Occurrence count per symptom, most frequent first
///
/// Ties keep the order in which the symptoms first appear in the log.
pub fn frequency_by_symptom(entries: &[LogEntry]) -> Vec<SymptomFrequency> {
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut frequencies: Vec<SymptomFrequency> = Vec::new();

    for entry in entries {
        let symptom = entry.symptom.as_str();
        match first_seen.get(symptom) {
            Some(&slot) => frequencies[slot].count += 1,
            None => {
                first_seen.insert(symptom, frequencies.len());
                frequencies.push(SymptomFrequency {
                    symptom: symptom.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    frequencies.sort_by(|a, b| b.count.cmp(&a.count));
    frequencies
}

/// Arithmetic mean severity per symptom, ordered by symptom name
pub fn mean_severity_by_symptom(entries: &[LogEntry]) -> Vec<SeverityAverage> {
    let mut totals: BTreeMap<&str, (u64, u64)> = BTreeMap::new();

    for entry in entries {
        let slot = totals.entry(entry.symptom.as_str()).or_insert((0, 0));
        slot.0 += u64::from(entry.severity.value());
        slot.1 += 1;
    }

    totals
        .into_iter()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(symptom, (sum, count))| SeverityAverage {
            symptom: symptom.to_string(),
            mean: sum as f64 / count as f64,
        })
        .collect()
}

/// Compute both aggregates for a log
pub fn summarize(entries: &[LogEntry]) -> InsightReport {
    InsightReport {
        total_entries: entries.len(),
        frequencies: frequency_by_symptom(entries),
        averages: mean_severity_by_symptom(entries),
    }
}
