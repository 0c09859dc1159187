use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{StringRecord, WriterBuilder};
use tracing::{debug, info};

use crate::common::{line_index, normalize_field, reader_builder, LeadingSpaceTrim};
use crate::errors::ParserError;
use crate::model::{RepairDialect, RepairSummary};

const STAGE: &str = "REPAIR";

/// A single cleaned record plus what had to be done to it.
#[derive(Debug, Clone)]
pub struct RepairedRecord {
    pub record: StringRecord,
    /// Label now in effect; becomes the carry for the next record.
    pub label: String,
    pub carried: bool,
    pub padded: bool,
    pub trailing_dropped: usize,
}

/// Repairs one raw record against the header width.
///
/// `carried` is the label of the previous record, `None` for the first data
/// row. A first row without a label is rejected since nothing can be carried.
pub fn repair_record(
    record: &StringRecord,
    carried: Option<&str>,
    width: usize,
    line_index: u64,
) -> Result<RepairedRecord, ParserError> {
    let mut fields: Vec<String> = record.iter().map(normalize_field).collect();
    if fields.is_empty() {
        fields.push(String::new());
    }

    let mut was_carried = false;
    if fields[0].is_empty() {
        let Some(previous) = carried else {
            return Err(ParserError::MissingSeedLabel {
                stage: STAGE,
                line_index,
            });
        };
        fields[0] = previous.to_string();
        was_carried = true;
    }

    let mut trailing_dropped = 0;
    while fields.len() > width && fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
        trailing_dropped += 1;
    }
    if fields.len() > width {
        return Err(ParserError::DataRow {
            stage: STAGE,
            line_index,
            message: format!(
                "record has {} non-empty fields but the header has {width}",
                fields.len()
            ),
        });
    }

    let padded = fields.len() < width;
    fields.resize(width, String::new());

    let label = fields[0].clone();
    Ok(RepairedRecord {
        record: fields.iter().collect(),
        label,
        carried: was_carried,
        padded,
        trailing_dropped,
    })
}

/// Streams raw comma-separated input into repaired output.
///
/// Records already written stay in `output` when a later record fails.
pub fn repair<R: Read, W: Write>(
    input: R,
    output: W,
    dialect: RepairDialect,
) -> Result<RepairSummary, ParserError> {
    let mut reader = reader_builder(b',').from_reader(LeadingSpaceTrim::new(input));
    let mut writer = WriterBuilder::new()
        .delimiter(dialect.delimiter())
        .from_writer(output);
    let mut records = reader.records();

    let header: StringRecord = match records.next() {
        Some(result) => result
            .map_err(|source| ParserError::Csv {
                stage: STAGE,
                source,
            })?
            .iter()
            .map(normalize_field)
            .collect(),
        None => return Err(ParserError::EmptyInput { stage: STAGE }),
    };
    let width = header.len();

    if dialect.writes_header() {
        writer
            .write_record(&header)
            .map_err(|source| ParserError::Csv {
                stage: STAGE,
                source,
            })?;
    }

    let mut summary = RepairSummary {
        header_width: width,
        ..RepairSummary::default()
    };
    let mut carried: Option<String> = None;

    for result in records {
        let record = result.map_err(|source| ParserError::Csv {
            stage: STAGE,
            source,
        })?;
        let line = line_index(&record);
        let repaired = repair_record(&record, carried.as_deref(), width, line)?;

        if repaired.carried {
            debug!(line, label = %repaired.label, "carried label forward");
            summary.labels_carried += 1;
        }
        if repaired.padded {
            summary.records_padded += 1;
        }
        summary.trailing_cells_dropped += repaired.trailing_dropped;
        summary.records += 1;

        writer
            .write_record(&repaired.record)
            .map_err(|source| ParserError::Csv {
                stage: STAGE,
                source,
            })?;
        carried = Some(repaired.label);
    }

    writer.flush().map_err(|err| ParserError::Csv {
        stage: STAGE,
        source: err.into(),
    })?;

    Ok(summary)
}

pub fn repair_file(
    input: &Path,
    output: &Path,
    dialect: RepairDialect,
) -> Result<RepairSummary, ParserError> {
    let source = File::open(input).map_err(|source| ParserError::Io {
        stage: STAGE,
        path: input.to_path_buf(),
        source,
    })?;
    let sink = File::create(output).map_err(|source| ParserError::Io {
        stage: STAGE,
        path: output.to_path_buf(),
        source,
    })?;

    let summary = repair(source, sink, dialect)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        dialect = %dialect,
        records = summary.records,
        labels_carried = summary.labels_carried,
        records_padded = summary.records_padded,
        "repaired traffic count export"
    );
    Ok(summary)
}

/// In-memory variant of [`repair`].
pub fn repair_str(
    content: &str,
    dialect: RepairDialect,
) -> Result<(String, RepairSummary), ParserError> {
    let mut buffer = Vec::with_capacity(content.len());
    let summary = repair(content.as_bytes(), &mut buffer, dialect)?;
    Ok((String::from_utf8_lossy(&buffer).into_owned(), summary))
}
