use std::path::Path;

use aadt_core::config::AadtConfig;
use aadt_core::pipeline::{run, run_extrapolation, run_repair};
use aadt_core::report::render_text;
use aadt_core::PipelineError;
use aadt_parser::{ParserError, RepairDialect};
use anyhow::Result;
use tempfile::TempDir;

fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../aadt-parser/tests/data")
        .join(name)
}

fn config_in(dir: &TempDir, dialect: RepairDialect) -> AadtConfig {
    let mut config = AadtConfig::default();
    config.repair.input = fixture_path("tabula-aadt.csv");
    config.repair.output = dir.path().join("fixed-data.csv");
    config.repair.dialect = dialect;
    config
}

const EXPECTED_REPORT: &str = "\
E OF MAIN ST @ OAK AVE: 0
N OF ELM ST @ MAIN ST: 506
S OF OAK AVE @ PINE ST: 780
W OF PINE ST @ OAK AVE: 1275
S OF 1ST AVE @ MAIN ST: 10583
N OF 1ST AVE @ MAIN ST: 14057";

#[test]
fn run_repairs_then_reports_sorted_projections() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config_in(&dir, RepairDialect::Csv);

    let (summary, report) = run(&config)?;
    assert_eq!(summary.records, 6);
    assert_eq!(summary.labels_carried, 2);

    let written = std::fs::read_to_string(&config.repair.output)?;
    let expected = std::fs::read_to_string(fixture_path("fixed-data.csv"))?;
    assert_eq!(
        written.lines().collect::<Vec<_>>(),
        expected.lines().collect::<Vec<_>>()
    );

    assert_eq!(render_text(&report.entries), EXPECTED_REPORT);
    Ok(())
}

#[test]
fn tsv_dialect_round_trips_through_both_stages() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config_in(&dir, RepairDialect::Tsv);

    run_repair(&config)?;
    let written = std::fs::read_to_string(&config.repair.output)?;
    assert!(!written.contains("Street"));
    assert!(written.lines().all(|line| line.split('\t').count() == 7));

    let report = run_extrapolation(&config)?;
    assert_eq!(render_text(&report.entries), EXPECTED_REPORT);
    assert_eq!(report.observed_labels[0], "y09");
    Ok(())
}

#[test]
fn extrapolation_can_read_an_existing_repaired_file() -> Result<()> {
    let mut config = AadtConfig::default();
    config.extrapolate.input = Some(fixture_path("fixed-data.csv"));

    let report = run_extrapolation(&config)?;
    assert_eq!(report.projected_labels, vec!["2014", "2015"]);
    assert_eq!(render_text(&report.entries), EXPECTED_REPORT);
    Ok(())
}

#[test]
fn run_reports_on_fresh_repair_not_configured_input() -> Result<()> {
    let dir = TempDir::new()?;
    let raw = dir.path().join("raw.csv");
    std::fs::write(&raw, "name,loc,y09,y10,y11,y12,y13\nNew St,Z,0,0,0,0,200\n")?;
    let stale = dir.path().join("stale.csv");
    std::fs::write(&stale, "name,loc,y09,y10,y11,y12,y13\nOld St,Z,0,0,0,0,1\n")?;

    let mut config = config_in(&dir, RepairDialect::Csv);
    config.repair.input = raw;
    config.extrapolate.input = Some(stale);

    let (_, report) = run(&config)?;
    assert_eq!(render_text(&report.entries), "Z @ New St: 212");

    let configured = run_extrapolation(&config)?;
    assert_eq!(render_text(&configured.entries), "Z @ Old St: 3");
    Ok(())
}

#[test]
fn missing_input_aborts_with_io_error() -> Result<()> {
    let dir = TempDir::new()?;
    let mut config = config_in(&dir, RepairDialect::Csv);
    config.repair.input = dir.path().join("does-not-exist.csv");

    match run(&config) {
        Err(PipelineError::Parser(ParserError::Io { path, .. })) => {
            assert_eq!(path, config.repair.input);
        }
        other => panic!("expected Io error, got {other:?}"),
    }
    assert!(!config.repair.output.exists());
    Ok(())
}

#[test]
fn bad_count_aborts_without_report() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("bad.csv");
    std::fs::write(
        &input,
        "Street,Location,2009,2010,2011,2012,2013\nMAIN ST,A,1,2,3,4,5\nMAIN ST,B,1,two,3,4,5\n",
    )?;
    let mut config = config_in(&dir, RepairDialect::Csv);
    config.repair.input = input;

    match run(&config) {
        Err(PipelineError::Parser(ParserError::DataRow { line_index, .. })) => {
            assert_eq!(line_index, 3);
        }
        other => panic!("expected DataRow error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn partial_output_remains_after_repair_failure() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("wide.csv");
    std::fs::write(&input, "name,loc,y09\nMain St,A,1\nMain St,B,2,3\n")?;
    let mut config = config_in(&dir, RepairDialect::Csv);
    config.repair.input = input;

    assert!(run_repair(&config).is_err());
    let written = std::fs::read_to_string(&config.repair.output)?;
    assert_eq!(
        written.lines().collect::<Vec<_>>(),
        vec!["name,loc,y09", "Main St,A,1"]
    );
    Ok(())
}
