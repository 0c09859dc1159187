pub mod config;
pub mod error;
pub mod extrapolation;
pub mod growth;
pub mod pipeline;
pub mod report;

pub use aadt_parser as parser;
pub use config::AadtConfig;
pub use error::{PipelineError, Result};
pub use extrapolation::{TrafficEntry, TrafficReport};
pub use report::ReportFormat;
