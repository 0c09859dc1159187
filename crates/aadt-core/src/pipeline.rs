use std::path::Path;

use aadt_parser::{read_count_file, repair_file, RepairSummary};
use tracing::{info, warn};

use crate::config::AadtConfig;
use crate::error::Result;
use crate::extrapolation::{extrapolate, TrafficReport};

/// Repairs `repair.input` into `repair.output`.
pub fn run_repair(config: &AadtConfig) -> Result<RepairSummary> {
    let repair = &config.repair;
    info!(
        input = %repair.input.display(),
        output = %repair.output.display(),
        "starting repair stage"
    );
    Ok(repair_file(&repair.input, &repair.output, repair.dialect)?)
}

/// Reads the configured repaired file and returns its entries sorted by final
/// projection.
pub fn run_extrapolation(config: &AadtConfig) -> Result<TrafficReport> {
    run_extrapolation_from(config.extrapolate_input(), config)
}

/// Extrapolates `input`, read with the repair dialect and projected with the
/// configured growth settings.
pub fn run_extrapolation_from(input: &Path, config: &AadtConfig) -> Result<TrafficReport> {
    let projection = config.projection()?;
    info!(input = %input.display(), "starting extrapolation stage");

    let table = read_count_file(input, config.repair.dialect)?;
    if table.is_empty() {
        warn!(input = %input.display(), "repaired file has no data rows");
    }

    Ok(extrapolate(table, &projection).sorted())
}

/// Repair followed by extrapolation of the file just written. Any
/// `extrapolate.input` setting is ignored here.
pub fn run(config: &AadtConfig) -> Result<(RepairSummary, TrafficReport)> {
    let summary = run_repair(config)?;
    let report = run_extrapolation_from(&config.repair.output, config)?;
    Ok((summary, report))
}
