use aadt_core::extrapolation::{extrapolate, projected_labels, TrafficEntry};
use aadt_core::growth::GrowthProjection;
use aadt_core::report::{render, render_text};
use aadt_core::ReportFormat;
use aadt_parser::{parse_count_table, repair_str, RepairDialect};
use anyhow::Result;

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn carried_row_drives_projection_from_latest_year() -> Result<()> {
    let raw = "name,loc,y09,y10,y11,y12,y13\nMain St,A,100,0,0,0,0\n,B,0,0,0,0,200\n";
    let (repaired, _) = repair_str(raw, RepairDialect::Csv)?;
    let table = parse_count_table(&repaired, RepairDialect::Csv)?;
    let report = extrapolate(table, &GrowthProjection::default());

    let second = &report.entries[1];
    assert_eq!(second.name(), "Main St");
    assert_eq!(second.location(), "B");
    assert_eq!(second.projected(), &[206, 212]);

    let first = &report.entries[0];
    assert_eq!(first.projected(), &[103, 106]);
    assert_eq!(report.projected_labels, labels(&["y14", "y15"]));
    Ok(())
}

#[test]
fn rows_without_data_project_to_zero() {
    let entry = TrafficEntry::new("Elm St", "N", [0; 5], &GrowthProjection::default());
    assert_eq!(entry.projected(), &[0, 0]);
    assert_eq!(entry.final_projection(), 0);
}

#[test]
fn projection_is_zero_only_when_chain_is_empty() {
    let projection = GrowthProjection::default();
    let cases: [[u64; 5]; 6] = [
        [0, 0, 0, 0, 0],
        [1, 0, 0, 0, 0],
        [0, 1, 0, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 0, 1, 0],
        [0, 0, 0, 0, 1],
    ];
    for observed in cases {
        let entry = TrafficEntry::new("St", "Loc", observed, &projection);
        let has_data = observed.iter().any(|count| *count != 0);
        for value in entry.projected() {
            assert_eq!(*value == 0, !has_data, "observed {observed:?}");
        }
    }
}

#[test]
fn older_years_are_only_used_when_newer_are_missing() {
    let projection = GrowthProjection::default();
    let entry = TrafficEntry::new("St", "Loc", [5_000, 0, 480, 0, 0], &projection);
    assert_eq!(entry.projected(), &[493, 506]);

    let newest = TrafficEntry::new("St", "Loc", [5_000, 0, 480, 0, 300], &projection);
    assert_eq!(newest.projected()[0], 308);
}

#[test]
fn equal_final_projections_keep_input_order() -> Result<()> {
    let content = concat!(
        "name,loc,y09,y10,y11,y12,y13\n",
        "X St,first,0,0,0,0,285\n",
        "Big St,big,0,0,0,0,9000\n",
        "Y St,second,0,0,0,0,285\n",
        "Small St,small,0,0,0,0,10\n",
    );
    let table = parse_count_table(content, RepairDialect::Csv)?;
    let report = extrapolate(table, &GrowthProjection::default()).sorted();

    let finals: Vec<u64> = report
        .entries
        .iter()
        .map(|entry| entry.final_projection())
        .collect();
    assert_eq!(finals, vec![12, 301, 301, 9477]);

    assert_eq!(
        render_text(&report.entries),
        "small @ Small St: 12\nfirst @ X St: 301\nsecond @ Y St: 301\nbig @ Big St: 9477"
    );
    Ok(())
}

#[test]
fn empty_report_renders_nothing() -> Result<()> {
    let table = parse_count_table("name,loc,y09,y10,y11,y12,y13\n", RepairDialect::Csv)?;
    let report = extrapolate(table, &GrowthProjection::default()).sorted();
    assert!(report.entries.is_empty());
    assert_eq!(render(&report, ReportFormat::Text)?, "");
    assert_eq!(render(&report, ReportFormat::Json)?, "[]");
    Ok(())
}

#[test]
fn json_report_labels_observed_and_projected_years() -> Result<()> {
    let content = "Street,Location,2009,2010,2011,2012,2013\nMain St,A,1,2,3,4,200\n";
    let table = parse_count_table(content, RepairDialect::Csv)?;
    let report = extrapolate(table, &GrowthProjection::default()).sorted();

    let rendered = render(&report, ReportFormat::Json)?;
    let value: serde_json::Value = serde_json::from_str(&rendered)?;
    let entry = &value[0];
    assert_eq!(entry["name"], "Main St");
    assert_eq!(entry["location"], "A");
    assert_eq!(entry["observed"]["2013"], 200);
    assert_eq!(entry["projected"]["2014"], 206);
    assert_eq!(entry["projected"]["2015"], 212);
    assert_eq!(entry["final_projection"], 212);
    Ok(())
}

#[test]
fn table_report_lists_every_entry() -> Result<()> {
    let content = "Street,Location,2009,2010,2011,2012,2013\nMain St,A,,,,,200\nOak Ave,B,,,,,\n";
    let table = parse_count_table(content, RepairDialect::Csv)?;
    let report = extrapolate(table, &GrowthProjection::default()).sorted();

    let rendered = render(&report, ReportFormat::Table)?;
    assert!(rendered.contains("Location"));
    assert!(rendered.contains("2015*"));
    assert!(rendered.contains("Main St"));
    assert!(rendered.contains("Oak Ave"));
    assert!(rendered.contains("212"));
    Ok(())
}

#[test]
fn projected_labels_continue_trailing_year_number() {
    assert_eq!(projected_labels(&labels(&["2012", "2013"]), 2), labels(&["2014", "2015"]));
    assert_eq!(projected_labels(&labels(&["y08", "y09"]), 2), labels(&["y10", "y11"]));
    assert_eq!(
        projected_labels(&labels(&["AADT"]), 2),
        labels(&["projected_1", "projected_2"])
    );
    assert_eq!(projected_labels(&[], 1), labels(&["projected_1"]));
}

#[test]
fn projected_labels_fall_back_when_year_number_would_overflow() {
    assert_eq!(
        projected_labels(&labels(&["18446744073709551615"]), 2),
        labels(&["projected_1", "projected_2"])
    );
    assert_eq!(
        projected_labels(&labels(&["y18446744073709551614"]), 2),
        labels(&["projected_1", "projected_2"])
    );
}
