#![forbid(unsafe_code)]

//! Core domain model and storage for the Health Alert symptom tracker.
//!
//! This crate provides:
//! - Domain types (symptom references, severity ratings, log entries)
//! - The symptom reference store and its built-in defaults
//! - The append-only CSV symptom log
//! - Frequency and average-severity insights
//! - The tracker context tying the stores together

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod reference;
pub mod log_store;
pub mod insights;
pub mod seasonal;
pub mod tracker;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use reference::{default_reference_table, ReferenceStore, ReferenceTable};
pub use log_store::LogStore;
pub use insights::{frequency_by_symptom, mean_severity_by_symptom, InsightReport};
pub use seasonal::{seasonal_illnesses, Season};
pub use tracker::{LoggedSymptom, Tracker};
