use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::info;

use crate::common::{line_index, normalize_field, parse_count, reader_builder};
use crate::errors::ParserError;
use crate::model::{
    CountTable, ObservedRow, RepairDialect, DEFAULT_YEAR_LABELS, MIN_ROW_WIDTH, OBSERVED_YEARS,
};

const STAGE: &str = "EXTRAPOLATE";

fn labels_from_header(header: &StringRecord) -> Vec<String> {
    DEFAULT_YEAR_LABELS
        .iter()
        .enumerate()
        .map(|(idx, fallback)| {
            header
                .get(idx + 2)
                .map(normalize_field)
                .filter(|label| !label.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        })
        .collect()
}

fn parse_row(
    record: &StringRecord,
    year_labels: &[String],
) -> Result<ObservedRow, ParserError> {
    let line_index = line_index(record);
    if record.len() < MIN_ROW_WIDTH {
        return Err(ParserError::DataRow {
            stage: STAGE,
            line_index,
            message: format!(
                "expected at least {MIN_ROW_WIDTH} fields, found {}",
                record.len()
            ),
        });
    }

    let mut counts = [0u64; OBSERVED_YEARS];
    for (idx, slot) in counts.iter_mut().enumerate() {
        let value = record.get(idx + 2).unwrap_or_default();
        *slot = parse_count(STAGE, value, line_index, &year_labels[idx])?;
    }

    Ok(ObservedRow {
        line_index,
        name: record.get(0).unwrap_or_default().to_string(),
        location: record.get(1).unwrap_or_default().to_string(),
        counts,
    })
}

/// Reads a repaired file written in `dialect`. The header row, when the
/// dialect has one, supplies the year labels and is not parsed as data.
pub fn read_count_table<R: Read>(
    input: R,
    dialect: RepairDialect,
) -> Result<CountTable, ParserError> {
    let mut reader = reader_builder(dialect.delimiter()).from_reader(input);
    let mut records = reader.records();

    let year_labels = if dialect.writes_header() {
        match records.next() {
            Some(result) => labels_from_header(&result.map_err(|source| ParserError::Csv {
                stage: STAGE,
                source,
            })?),
            None => return Err(ParserError::EmptyInput { stage: STAGE }),
        }
    } else {
        CountTable::default_year_labels()
    };

    let mut rows = Vec::new();
    for result in records {
        let record = result.map_err(|source| ParserError::Csv {
            stage: STAGE,
            source,
        })?;
        rows.push(parse_row(&record, &year_labels)?);
    }

    Ok(CountTable { year_labels, rows })
}

pub fn read_count_file(path: &Path, dialect: RepairDialect) -> Result<CountTable, ParserError> {
    let source = File::open(path).map_err(|source| ParserError::Io {
        stage: STAGE,
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_count_table(source, dialect)?;
    info!(
        input = %path.display(),
        dialect = %dialect,
        rows = table.rows.len(),
        "parsed repaired traffic counts"
    );
    Ok(table)
}

pub fn parse_count_table(content: &str, dialect: RepairDialect) -> Result<CountTable, ParserError> {
    read_count_table(content.as_bytes(), dialect)
}
