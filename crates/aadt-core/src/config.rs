use std::path::{Path, PathBuf};

use aadt_parser::RepairDialect;
use serde::Deserialize;

use crate::error::Result;
use crate::growth::{GrowthFactor, GrowthProjection, DEFAULT_GROWTH_FACTOR, DEFAULT_PROJECTED_YEARS};
use crate::report::ReportFormat;

pub const DEFAULT_RAW_INPUT: &str = "tabula-aadt.csv";
pub const DEFAULT_REPAIRED_OUTPUT: &str = "fixed-data.csv";

/// Settings for both stages, usually read from a TOML file.
///
/// ```toml
/// [repair]
/// input = "tabula-aadt.csv"
/// output = "fixed-data.csv"
/// dialect = "csv"
///
/// [extrapolate]
/// growth_factor = 1.0261
/// projected_years = 2
/// format = "text"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AadtConfig {
    pub repair: RepairConfig,
    pub extrapolate: ExtrapolateConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepairConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub dialect: RepairDialect,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_RAW_INPUT),
            output: PathBuf::from(DEFAULT_REPAIRED_OUTPUT),
            dialect: RepairDialect::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtrapolateConfig {
    /// Repaired file to read; the repair output when unset.
    pub input: Option<PathBuf>,
    pub growth_factor: f64,
    pub projected_years: usize,
    pub format: ReportFormat,
}

impl Default for ExtrapolateConfig {
    fn default() -> Self {
        Self {
            input: None,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            projected_years: DEFAULT_PROJECTED_YEARS,
            format: ReportFormat::default(),
        }
    }
}

impl AadtConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AadtConfig = toml::from_str(content)?;
        config.projection()?;
        Ok(config)
    }

    pub fn extrapolate_input(&self) -> &Path {
        self.extrapolate
            .input
            .as_deref()
            .unwrap_or(self.repair.output.as_path())
    }

    pub fn projection(&self) -> Result<GrowthProjection> {
        let factor = GrowthFactor::from_f64(self.extrapolate.growth_factor)?;
        GrowthProjection::new(factor, self.extrapolate.projected_years)
    }
}
