use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("{stage} failed to access '{}': {source}", .path.display())]
    Io {
        stage: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} CSV error: {source}")]
    Csv {
        stage: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{stage} input did not contain a header row")]
    EmptyInput { stage: &'static str },

    #[error("{stage} first data row (line {line_index}) has no label to carry forward")]
    MissingSeedLabel {
        stage: &'static str,
        line_index: u64,
    },

    #[error("{stage} data row {line_index} invalid: {message}")]
    DataRow {
        stage: &'static str,
        line_index: u64,
        message: String,
    },
}
