// crates/aadt-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Parser(#[from] aadt_parser::ParserError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file could not be parsed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
