use std::io::{self, Read};

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::errors::ParserError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldState {
    Start,
    Unquoted,
    Quoted,
    AfterQuote,
}

/// Drops spaces and tabs at the start of every comma-separated field before
/// the bytes reach the CSV tokenizer, so `a, "1,234"` is read as two fields.
///
/// `Trim::All` only trims after tokenizing, which is too late for a quote
/// that follows a space.
pub(crate) struct LeadingSpaceTrim<R> {
    inner: R,
    state: FieldState,
}

impl<R> LeadingSpaceTrim<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            state: FieldState::Start,
        }
    }

    fn keep(&mut self, byte: u8) -> bool {
        use FieldState::*;

        let (next, keep) = match (self.state, byte) {
            (Start, b' ' | b'\t') => (Start, false),
            (Start, b'"') => (Quoted, true),
            (Quoted, b'"') => (AfterQuote, true),
            (Quoted, _) => (Quoted, true),
            // Doubled quote inside a quoted field.
            (AfterQuote, b'"') => (Quoted, true),
            (_, b',' | b'\n' | b'\r') => (Start, true),
            _ => (Unquoted, true),
        };
        self.state = next;
        keep
    }
}

impl<R: Read> Read for LeadingSpaceTrim<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let read = self.inner.read(buf)?;
            if read == 0 {
                return Ok(0);
            }

            let mut kept = 0;
            for index in 0..read {
                let byte = buf[index];
                if self.keep(byte) {
                    buf[kept] = byte;
                    kept += 1;
                }
            }
            if kept > 0 {
                return Ok(kept);
            }
        }
    }
}

/// Reader settings shared by both stages: ragged rows allowed, every field
/// trimmed, no implicit header handling.
pub(crate) fn reader_builder(delimiter: u8) -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter);
    builder
}

pub(crate) fn line_index(record: &StringRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or(0)
}

/// Drops every double quote and the surrounding whitespace.
pub fn normalize_field(value: &str) -> String {
    let unquoted: String = value.chars().filter(|c| *c != '"').collect();
    unquoted.trim().to_string()
}

/// Parses a traffic count. Quotes and comma group separators are ignored and
/// an empty cell is the "no data" sentinel 0.
pub fn parse_count(
    stage: &'static str,
    value: &str,
    line_index: u64,
    column: &str,
) -> Result<u64, ParserError> {
    let cleaned: String = value.chars().filter(|c| *c != '"' && *c != ',').collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u64>()
        .map_err(|err| ParserError::DataRow {
            stage,
            line_index,
            message: format!("failed to parse column '{column}' value '{value}' as a count: {err}"),
        })
}
