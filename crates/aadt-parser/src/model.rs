use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of observed year columns following the name and location columns.
pub const OBSERVED_YEARS: usize = 5;

/// Minimum width of a cleaned row: name, location, then the observed years.
pub const MIN_ROW_WIDTH: usize = 2 + OBSERVED_YEARS;

/// Year labels used when the dialect writes no header to take them from.
pub const DEFAULT_YEAR_LABELS: [&str; OBSERVED_YEARS] = ["y09", "y10", "y11", "y12", "y13"];

/// Layout of the repaired file.
///
/// `Csv` keeps comma separation and writes the header line. `Tsv` uses tab
/// separation and omits the header. Both pad short rows to the full header
/// width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairDialect {
    #[default]
    Csv,
    Tsv,
}

impl RepairDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairDialect::Csv => "csv",
            RepairDialect::Tsv => "tsv",
        }
    }

    pub fn delimiter(&self) -> u8 {
        match self {
            RepairDialect::Csv => b',',
            RepairDialect::Tsv => b'\t',
        }
    }

    pub fn writes_header(&self) -> bool {
        matches!(self, RepairDialect::Csv)
    }
}

impl fmt::Display for RepairDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RepairDialect {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" | "comma" => Ok(RepairDialect::Csv),
            "tsv" | "tab" => Ok(RepairDialect::Tsv),
            other => Err(format!("unknown repair dialect '{other}'")),
        }
    }
}

/// Counters collected while repairing a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairSummary {
    pub header_width: usize,
    pub records: usize,
    pub labels_carried: usize,
    pub records_padded: usize,
    pub trailing_cells_dropped: usize,
}

/// One cleaned row with its counts parsed. A zero count means "no data".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedRow {
    pub line_index: u64,
    pub name: String,
    pub location: String,
    /// Oldest year first.
    pub counts: [u64; OBSERVED_YEARS],
}

/// Parsed contents of a repaired file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTable {
    pub year_labels: Vec<String>,
    pub rows: Vec<ObservedRow>,
}

impl CountTable {
    pub fn default_year_labels() -> Vec<String> {
        DEFAULT_YEAR_LABELS.iter().map(|s| s.to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
