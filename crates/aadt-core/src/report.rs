use std::fmt;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, Table};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::extrapolation::{TrafficEntry, TrafficReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Table,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Table => "table",
            ReportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReportFormat {
    type Error = String;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "table" => Ok(ReportFormat::Table),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{other}'")),
        }
    }
}

pub fn render(report: &TrafficReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(&report.entries)),
        ReportFormat::Table => Ok(render_table(report)),
        ReportFormat::Json => render_json(report),
    }
}

/// One `location @ name: value` line per entry using the final projection.
pub fn render_text(entries: &[TrafficEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{} @ {}: {}",
                entry.location(),
                entry.name(),
                entry.final_projection()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_table(report: &TrafficReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec!["Location".to_string(), "Name".to_string()];
    header.extend(report.observed_labels.iter().cloned());
    header.extend(report.projected_labels.iter().map(|label| format!("{label}*")));
    let columns = header.len();
    table.set_header(header);

    for entry in &report.entries {
        let mut row = vec![entry.location().to_string(), entry.name().to_string()];
        row.extend(entry.observed().iter().map(|count| display_count(*count)));
        row.extend(entry.projected().iter().map(|count| display_count(*count)));
        table.add_row(row);
    }

    for idx in 2..columns {
        if let Some(column) = table.column_mut(idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    table.to_string()
}

fn display_count(count: u64) -> String {
    if count == 0 {
        "-".to_string()
    } else {
        count.to_string()
    }
}

pub fn render_json(report: &TrafficReport) -> Result<String> {
    let entries: Vec<Value> = report
        .entries
        .iter()
        .map(|entry| {
            json!({
                "name": entry.name(),
                "location": entry.location(),
                "observed": labelled(&report.observed_labels, entry.observed()),
                "projected": labelled(&report.projected_labels, entry.projected()),
                "final_projection": entry.final_projection(),
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

fn labelled(labels: &[String], counts: &[u64]) -> Value {
    let map: Map<String, Value> = labels
        .iter()
        .zip(counts)
        .map(|(label, count)| (label.clone(), json!(count)))
        .collect();
    Value::Object(map)
}
