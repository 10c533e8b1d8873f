//! Rendering of a [`BalanceHistory`] for a line chart.

use anyhow::{Context, Result};
use clap::ValueEnum;
use rust_decimal::prelude::ToPrimitive;
use serde_derive::Serialize;

use crate::history::{day_label, BalanceHistory};
use crate::money;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Parallel `dates`/`balances` arrays, ready to hand to a chart.
    #[default]
    Json,
    /// One row per day.
    Csv,
}

#[derive(Debug, Serialize)]
struct ChartSeries {
    /// Axis labels.
    dates: Vec<String>,
    /// ISO dates matching the labels.
    days: Vec<String>,
    balances: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct CsvRow {
    date: String,
    label: String,
    balance: String,
}

const CSV_HEADERS: [&str; 3] = ["date", "label", "balance"];

pub fn render(history: &BalanceHistory, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(history),
        OutputFormat::Csv => render_csv(history),
    }
}

fn render_json(history: &BalanceHistory) -> Result<String> {
    let series = ChartSeries {
        dates: history.labels(),
        days: history.dates.iter().map(|d| d.to_string()).collect(),
        balances: history
            .balances
            .iter()
            .map(|b| b.to_f64().unwrap_or_default())
            .collect(),
    };
    let mut s = serde_json::to_string_pretty(&series).context("encoding chart series")?;
    s.push('\n');
    Ok(s)
}

fn render_csv(history: &BalanceHistory) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    // Written explicitly so that an empty history still has a header.
    wtr.write_record(CSV_HEADERS)?;
    for point in history.iter() {
        wtr.serialize(CsvRow {
            date: point.date.to_string(),
            label: day_label(&point.date),
            balance: money::fixed(point.balance),
        })?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}
