//! Text rendering for the interactive menu.
//!
//! Everything writes to a caller-supplied `Write` so the same code drives the
//! terminal and the tests.

use health_core::{Error, InsightReport, LogEntry, LoggedSymptom, Season};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Optional coloring of headings and messages
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub color: bool,
}

impl Palette {
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn title(&self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn section(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn good(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bad(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn menu(out: &mut impl Write, palette: Palette) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", palette.title("=== Health Alert Bot ==="))?;
    writeln!(out, "1. Log New Symptoms")?;
    writeln!(out, "2. View Health History")?;
    writeln!(out, "3. Get Health Insights")?;
    writeln!(out, "4. Learn About Seasonal Illnesses")?;
    writeln!(out, "5. Exit")?;
    Ok(())
}

pub fn error(out: &mut impl Write, palette: Palette, message: &str) -> io::Result<()> {
    writeln!(out, "{}", palette.bad(message))
}

/// Report a failure that ends the run
pub fn fatal(out: &mut impl Write, palette: Palette, err: &Error) -> io::Result<()> {
    writeln!(out, "{} {}", palette.bad("Error:"), err)?;
    if matches!(err, Error::StoreCorrupt { .. }) {
        writeln!(
            out,
            "Fix or move the file aside and run again; it has not been modified."
        )?;
    }
    Ok(())
}

pub fn symptom_list(out: &mut impl Write, palette: Palette, names: &[&str]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", palette.section("Available Symptoms:"))?;
    for (i, name) in names.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, name)?;
    }
    Ok(())
}

pub fn logged(out: &mut impl Write, palette: Palette, logged: &LoggedSymptom) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", palette.good("Suggested Remedies:"))?;
    for remedy in logged.entry.remedies() {
        writeln!(out, "- {}", remedy)?;
    }

    if let Some(advisory) = &logged.advisory {
        writeln!(out)?;
        writeln!(out, "{}", palette.bad("⚠️ MEDICAL ATTENTION ADVISED:"))?;
        writeln!(out, "{}", advisory)?;
    }
    Ok(())
}

pub fn history(out: &mut impl Write, palette: Palette, entries: &[LogEntry]) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "{}", palette.section("No entries in health log yet."));
    }

    let rows: Vec<[String; 4]> = entries
        .iter()
        .map(|e| {
            [
                e.formatted_timestamp(),
                e.symptom.clone(),
                e.severity.to_string(),
                e.remedies_suggested.clone(),
            ]
        })
        .collect();

    let header = health_core::log_store::LOG_HEADER;
    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", palette.title("Your Health History:"))?;
    write_row(out, &header, &widths)?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row<S: AsRef<str>>(
    out: &mut impl Write,
    cells: &[S],
    widths: &[usize],
) -> io::Result<()> {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect();
    writeln!(out, "{}", line.join("  ").trim_end())
}

pub fn insights(out: &mut impl Write, palette: Palette, report: &InsightReport) -> io::Result<()> {
    if report.is_empty() {
        return writeln!(out, "{}", palette.section("No entries to analyze yet."));
    }

    writeln!(out)?;
    writeln!(out, "{}", palette.title("Health Insights:"))?;

    writeln!(out)?;
    writeln!(out, "Most Common Symptoms:")?;
    for freq in &report.frequencies {
        writeln!(out, "- {}: {} times", freq.symptom, freq.count)?;
    }

    writeln!(out)?;
    writeln!(out, "Average Severity by Symptom:")?;
    for avg in &report.averages {
        writeln!(out, "- {}: {}/5", avg.symptom, avg)?;
    }
    Ok(())
}

pub fn seasonal(out: &mut impl Write, palette: Palette, seasons: &[Season]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", palette.title("Common Seasonal Illnesses:"))?;
    for season in seasons {
        writeln!(out)?;
        writeln!(out, "{}", palette.section(&format!("{}:", season.name)))?;
        for illness in season.illnesses {
            writeln!(out, "- {}", illness)?;
        }
    }
    Ok(())
}
