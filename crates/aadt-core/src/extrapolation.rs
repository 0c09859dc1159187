use aadt_parser::{CountTable, ObservedRow, OBSERVED_YEARS};
use tracing::info;

use crate::growth::GrowthProjection;

/// A counted location with its projected years. Projections are computed
/// when the entry is built and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficEntry {
    name: String,
    location: String,
    observed: [u64; OBSERVED_YEARS],
    projected: Vec<u64>,
}

impl TrafficEntry {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        observed: [u64; OBSERVED_YEARS],
        projection: &GrowthProjection,
    ) -> Self {
        let projected = projection.project(&observed);
        Self {
            name: name.into(),
            location: location.into(),
            observed,
            projected,
        }
    }

    pub fn from_row(row: ObservedRow, projection: &GrowthProjection) -> Self {
        Self::new(row.name, row.location, row.counts, projection)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Observed counts, oldest first. Zero means the year has no data.
    pub fn observed(&self) -> &[u64; OBSERVED_YEARS] {
        &self.observed
    }

    /// Projected counts, nearest year first.
    pub fn projected(&self) -> &[u64] {
        &self.projected
    }

    /// Most distant projected year, the value reports sort and print by.
    pub fn final_projection(&self) -> u64 {
        self.projected.last().copied().unwrap_or(0)
    }
}

/// Extrapolated entries with the column labels they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficReport {
    pub observed_labels: Vec<String>,
    pub projected_labels: Vec<String>,
    pub entries: Vec<TrafficEntry>,
}

impl TrafficReport {
    /// Orders entries by final projection, ascending. Equal values keep their
    /// input order.
    pub fn sorted(mut self) -> Self {
        self.entries.sort_by_key(TrafficEntry::final_projection);
        self
    }
}

pub fn extrapolate(table: CountTable, projection: &GrowthProjection) -> TrafficReport {
    let projected_labels = projected_labels(&table.year_labels, projection.years);
    let entries: Vec<TrafficEntry> = table
        .rows
        .into_iter()
        .map(|row| TrafficEntry::from_row(row, projection))
        .collect();

    let without_data = entries
        .iter()
        .filter(|entry| entry.final_projection() == 0)
        .count();
    info!(
        entries = entries.len(),
        without_data,
        growth_factor = projection.factor.as_f64(),
        years = projection.years,
        "extrapolated traffic counts"
    );

    TrafficReport {
        observed_labels: table.year_labels,
        projected_labels,
        entries,
    }
}

/// Continues the trailing number of the newest observed label ("2013" gives
/// "2014", "y13" gives "y14"). Labels without one fall back to "projected_N".
pub fn projected_labels(observed: &[String], years: usize) -> Vec<String> {
    let newest = observed.last().map(String::as_str).unwrap_or_default();
    let digits = newest
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();
    let (prefix, number) = newest.split_at(newest.len() - digits);

    let continued = number.parse::<u64>().ok().and_then(|base| {
        (1..=years as u64)
            .map(|step| {
                base.checked_add(step)
                    .map(|year| format!("{prefix}{year:0width$}", width = digits))
            })
            .collect::<Option<Vec<_>>>()
    });

    continued.unwrap_or_else(|| (1..=years).map(|step| format!("projected_{step}")).collect())
}
