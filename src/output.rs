//! Report rows: percentage formatting, stdout printing and CSV append.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::HubTotals;
use crate::analyzers::utility::{pct, round1};
use crate::config::Statistic;

/// One formatted hub row.
///
/// `summary` is `None` when the hub had no age population, in which case
/// the row is the hub name alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubRow {
    pub hub: String,
    pub summary: Option<RowSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSummary {
    /// Age population in millions, one decimal.
    pub population_millions: f64,
    /// Age, race, language then income percentages in category order.
    pub percentages: Vec<f64>,
}

impl HubRow {
    pub fn from_totals(totals: &HubTotals) -> Self {
        let population = totals.grand_total(Statistic::Age);
        if population == 0 {
            return Self {
                hub: totals.hub.clone(),
                summary: None,
            };
        }

        let percentages = Statistic::ALL
            .iter()
            .flat_map(|statistic| {
                let grand_total = totals.grand_total(*statistic);
                statistic.categories().iter().map(move |category| {
                    round1(pct(totals.category(*statistic, category.name), grand_total))
                })
            })
            .collect();

        Self {
            hub: totals.hub.clone(),
            summary: Some(RowSummary {
                population_millions: round1(population as f64 / 1_000_000.0),
                percentages,
            }),
        }
    }

    pub fn fields(&self) -> Vec<String> {
        let mut fields = vec![self.hub.clone()];
        if let Some(summary) = &self.summary {
            fields.push(format!("{:.1}", summary.population_millions));
            fields.extend(summary.percentages.iter().map(|p| format!("{p:.1}")));
        }
        fields
    }

    /// The row as one comma-separated line, without a trailing newline.
    pub fn to_line(&self) -> String {
        self.fields().join(",")
    }
}

/// Formats `totals` as a report line.
pub fn format_row(totals: &HubTotals) -> String {
    HubRow::from_totals(totals).to_line()
}

/// Column names matching [`HubRow::fields`] for a non-degenerate row.
pub fn column_headers() -> Vec<String> {
    let mut headers = vec!["hub".to_string(), "population_millions".to_string()];
    for statistic in Statistic::ALL {
        for category in statistic.categories() {
            headers.push(format!("{} {}", statistic.label(), category.name));
        }
    }
    headers
}

/// Writes the row to stdout followed by a newline.
pub fn print_row(row: &HubRow) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", row.to_line())?;
    stdout.flush()?;
    Ok(())
}

/// Logs hub totals as pretty-printed JSON.
pub fn print_json(totals: &HubTotals) -> Result<()> {
    debug!("{}", serde_json::to_string_pretty(totals)?);
    Ok(())
}

/// Appends a [`HubRow`] to a CSV file.
///
/// Creates the file with a header row if it does not already exist.
/// Degenerate rows are written with just the hub name.
pub fn append_record(path: &str, row: &HubRow) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new().flexible(true).from_writer(file);

    if !file_exists {
        writer.write_record(column_headers())?;
    }
    writer.write_record(row.fields())?;
    writer.flush()?;

    info!(path, hub = %row.hub, "Row appended");
    Ok(())
}
